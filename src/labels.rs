//! DNS label mangling.
//!
//! Task and framework names arrive as arbitrary strings; before they can be
//! served as DNS records they must be rewritten into host-name labels that
//! satisfy RFC952 or RFC1123. The mangler never rejects input, it always
//! produces a corrected (possibly empty) label.

/// Default domain fragment separator.
pub const SEP: &str = ".";

/// Characters allowed in the body of a label.
const ALLOWED_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Label mangling rules for one RFC profile: maximum label length,
/// characters forbidden at the start of a label, and characters trimmed
/// from the end of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub max_len: usize,
    pub left: &'static [u8],
    pub right: &'static [u8],
}

/// RFC952 host name rules: 24 character labels, no leading digit or hyphen.
pub const RFC952: Profile = Profile {
    max_len: 24,
    left: b"-0123456789",
    right: b"-",
};

/// RFC1123 host name rules: 63 character labels, leading digits allowed.
pub const RFC1123: Profile = Profile {
    max_len: 63,
    left: b"-",
    right: b"-",
};

/// Mangles a name to conform to the DNS label rules specified in RFC952.
/// See http://www.rfc-base.org/txt/rfc-952.txt
pub fn rfc952_label(name: &str) -> String {
    label(name, RFC952)
}

/// Mangles a name to conform to the DNS label rules specified in RFC1123.
/// See http://www.rfc-base.org/txt/rfc-1123.txt
pub fn rfc1123_label(name: &str) -> String {
    label(name, RFC1123)
}

/// Mangles the given name into a single label under the given profile.
pub fn label(name: &str, profile: Profile) -> String {
    Mangler::new(name, profile).run()
}

/// Mangles the given name in order to produce a valid domain fragment:
/// one or more host name labels concatenated by the given separator.
/// Fragments that mangle down to nothing are dropped.
pub fn domain_frag<F>(name: &str, sep: &str, label_fn: F) -> String
where
    F: Fn(&str) -> String,
{
    let labels: Vec<String> = name
        .split(sep)
        .map(|part| label_fn(part))
        .filter(|lab| !lab.is_empty())
        .collect();
    labels.join(sep)
}

/// Transducer phase. The leading-character rule only matters before the
/// first byte is kept, and the length cap only matters after it is hit,
/// so each gets its own phase instead of per-byte branching.
#[derive(Debug, Clone, Copy)]
enum Phase {
    /// Consuming the forbidden-leading prefix, nothing kept yet.
    Skip,
    /// Appending body bytes and normalized separators up to the cap.
    Fill,
    /// Cap was hit once; only body bytes fill the remaining budget.
    Drain,
}

/// One mangling run over a lowercased input. Owned by a single call,
/// discarded on completion.
struct Mangler {
    name: Vec<u8>,
    accum: Vec<u8>,
    profile: Profile,
    pos: usize,
}

impl Mangler {
    fn new(name: &str, profile: Profile) -> Self {
        Mangler {
            name: name.as_bytes().to_ascii_lowercase(),
            accum: Vec::with_capacity(name.len().min(profile.max_len)),
            profile,
            pos: 0,
        }
    }

    fn run(mut self) -> String {
        let mut phase = Phase::Skip;
        loop {
            phase = match phase {
                Phase::Skip => match self.skip() {
                    Some(next) => next,
                    None => break,
                },
                Phase::Fill => match self.fill() {
                    Some(next) => next,
                    None => break,
                },
                Phase::Drain => match self.drain() {
                    Some(next) => next,
                    None => break,
                },
            };
        }
        // accum only ever holds ASCII from ALLOWED_CHARS plus '-'
        String::from_utf8(self.accum).unwrap_or_default()
    }

    fn skip(&mut self) -> Option<Phase> {
        let Some(&b) = self.name.get(self.pos) else {
            self.trim_right(self.profile.right);
            return None;
        };
        if is_allowed(b) && !self.profile.left.contains(&b) {
            return Some(Phase::Fill);
        }
        self.pos += 1;
        Some(Phase::Skip)
    }

    fn fill(&mut self) -> Option<Phase> {
        let Some(&b) = self.name.get(self.pos) else {
            self.trim_right(self.profile.right);
            return None;
        };
        if self.accum.len() >= self.profile.max_len {
            self.trim_right(b"-");
            return Some(Phase::Drain);
        }
        if b == b'-' || b == b'_' || b == b'.' {
            self.accum.push(b'-');
        } else if is_allowed(b) {
            self.accum.push(b);
        }
        self.pos += 1;
        Some(Phase::Fill)
    }

    fn drain(&mut self) -> Option<Phase> {
        let at_end = self.pos >= self.name.len() || self.accum.len() == self.profile.max_len;
        if at_end {
            self.trim_right(self.profile.right);
            return None;
        }
        let b = self.name[self.pos];
        if is_allowed(b) {
            self.accum.push(b);
        }
        self.pos += 1;
        Some(Phase::Drain)
    }

    fn trim_right(&mut self, chars: &[u8]) {
        while self.accum.last().is_some_and(|b| chars.contains(b)) {
            self.accum.pop();
        }
    }
}

fn is_allowed(b: u8) -> bool {
    ALLOWED_CHARS.contains(&b)
}
