//! Address-format validation for the service-discovery configuration.
//!
//! Masters, resolvers and IP sources arrive as plain strings in the config
//! file; these validators reject malformed or duplicated entries before the
//! server starts. They report the first failure and never recover locally,
//! the config loader decides whether startup aborts.

use std::collections::HashSet;
use std::net::IpAddr;
use std::str::FromStr;

use thiserror::Error;

/// Validation errors for configured address lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("illegal host:port specified: {0}")]
    Format(String),

    #[error("missing port in {0}")]
    MissingPort(String),

    #[error("illegal ip specified: {0}")]
    InvalidIp(String),

    #[error("duplicate host specified: {0}")]
    Duplicate(String),

    #[error("empty ip sources")]
    EmptyIpSources,

    #[error("invalid ip source {0:?}")]
    InvalidIpSource(String),
}

/// Where task IPs are looked up, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpSource {
    Host,
    Docker,
    Mesos,
    Netinfo,
}

impl FromStr for IpSource {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(IpSource::Host),
            "docker" => Ok(IpSource::Docker),
            "mesos" => Ok(IpSource::Mesos),
            "netinfo" => Ok(IpSource::Netinfo),
            other => Err(ValidationError::InvalidIpSource(other.to_string())),
        }
    }
}

/// Checks that each master is a properly formatted host|IP:port pair.
/// Duplicate masters in the list are not allowed. The list may be empty.
pub fn validate_masters(masters: &[String]) -> Result<(), ValidationError> {
    validate_host_ports(masters, false, "5050", true)
}

/// Checks that each resolver is a properly formatted IP address or IP:port
/// pair. Duplicate resolvers in the list are not allowed. The list may be
/// empty.
pub fn validate_resolvers(resolvers: &[String]) -> Result<(), ValidationError> {
    validate_host_ports(resolvers, true, "53", false)
}

/// Validates a list of `host[:port]` entries. Each entry is normalized to
/// `host_port` (default port filled in when absent, IP literals
/// canonicalized) and duplicates of the normalized form are rejected.
pub fn validate_host_ports(
    host_ports: &[String],
    ip_required: bool,
    default_port: &str,
    port_required: bool,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(host_ports.len());
    for hp in host_ports {
        let normalized = normalize_host_port(hp, ip_required, default_port, port_required)?;
        if !seen.insert(normalized.clone()) {
            return Err(ValidationError::Duplicate(normalized));
        }
    }
    Ok(())
}

/// Checks validity of IP sources: non-empty, no duplicates, every entry a
/// known source name.
pub fn validate_ip_sources(sources: &[String]) -> Result<(), ValidationError> {
    if sources.is_empty() {
        return Err(ValidationError::EmptyIpSources);
    }
    let mut seen = HashSet::with_capacity(sources.len());
    for src in sources {
        let parsed: IpSource = src.parse()?;
        if !seen.insert(parsed) {
            return Err(ValidationError::Duplicate(src.clone()));
        }
    }
    Ok(())
}

fn normalize_host_port(
    host_port: &str,
    ip_required: bool,
    default_port: &str,
    port_required: bool,
) -> Result<String, ValidationError> {
    let (mut host, port) = match split_host_port(host_port) {
        Ok((host, port)) => (host, port),
        Err(SplitError::MissingPort) if port_required => {
            return Err(ValidationError::MissingPort(host_port.to_string()));
        }
        Err(SplitError::Malformed) if port_required => {
            return Err(ValidationError::Format(host_port.to_string()));
        }
        // Not host:port shaped; treat the whole entry as a host and fall
        // back to the default port.
        Err(_) => (host_port.to_string(), default_port.to_string()),
    };

    match host.parse::<IpAddr>() {
        Ok(ip) => host = ip.to_string(),
        Err(_) if ip_required => return Err(ValidationError::InvalidIp(host)),
        Err(_) => {}
    }

    Ok(format!("{host}_{port}"))
}

enum SplitError {
    MissingPort,
    Malformed,
}

/// Splits `host:port`, `[v6]:port` style entries. Ports must be numeric.
fn split_host_port(entry: &str) -> Result<(String, String), SplitError> {
    let (host, port) = if let Some(rest) = entry.strip_prefix('[') {
        let Some((host, after)) = rest.split_once(']') else {
            return Err(SplitError::Malformed);
        };
        match after.strip_prefix(':') {
            Some(port) => (host, port),
            None if after.is_empty() => return Err(SplitError::MissingPort),
            None => return Err(SplitError::Malformed),
        }
    } else {
        match entry.matches(':').count() {
            0 => return Err(SplitError::MissingPort),
            1 => {
                let Some(pair) = entry.split_once(':') else {
                    return Err(SplitError::Malformed);
                };
                pair
            }
            // Bare IPv6 or junk; either way not a host:port pair.
            _ => return Err(SplitError::Malformed),
        }
    };

    if host.is_empty() || port.parse::<u16>().is_err() {
        return Err(SplitError::Malformed);
    }
    Ok((host.to_string(), port.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_host_port_list_is_valid() {
        assert!(validate_host_ports(&[], true, "53", false).is_ok());
        assert!(validate_masters(&[]).is_ok());
        assert!(validate_resolvers(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_host_ports_rejected() {
        let entries = list(&["10.0.0.1:5050", "10.0.0.1:5050"]);
        assert!(matches!(
            validate_host_ports(&entries, true, "5050", false),
            Err(ValidationError::Duplicate(_))
        ));
    }

    #[test]
    fn test_duplicate_after_default_port_fill() {
        // Same resolver with and without an explicit port normalizes to the
        // same host_port pair.
        let entries = list(&["10.0.0.1:53", "10.0.0.1"]);
        assert!(matches!(
            validate_resolvers(&entries),
            Err(ValidationError::Duplicate(_))
        ));
    }

    #[test]
    fn test_masters_require_port() {
        assert!(matches!(
            validate_masters(&list(&["10.0.0.1"])),
            Err(ValidationError::MissingPort(_))
        ));
        assert!(validate_masters(&list(&["10.0.0.1:5050"])).is_ok());
    }

    #[test]
    fn test_masters_allow_hostnames() {
        assert!(validate_masters(&list(&["master.mesos:5050", "10.0.0.2:5050"])).is_ok());
    }

    #[test]
    fn test_resolvers_require_ip() {
        assert!(matches!(
            validate_resolvers(&list(&["ns1.example.com:53"])),
            Err(ValidationError::InvalidIp(_))
        ));
        assert!(validate_resolvers(&list(&["8.8.8.8", "8.8.4.4:53"])).is_ok());
    }

    #[test]
    fn test_bracketed_ipv6() {
        assert!(validate_resolvers(&list(&["[2001:db8::1]:53"])).is_ok());
        // Canonicalization catches dressed-up duplicates.
        assert!(matches!(
            validate_resolvers(&list(&["[2001:db8::1]:53", "[2001:0db8::1]:53"])),
            Err(ValidationError::Duplicate(_))
        ));
    }

    #[test]
    fn test_bare_ipv6_falls_back_to_default_port() {
        assert!(validate_resolvers(&list(&["2001:db8::1"])).is_ok());
    }

    #[test]
    fn test_malformed_host_port_with_port_required() {
        assert!(matches!(
            validate_masters(&list(&["10.0.0.1:port"])),
            Err(ValidationError::Format(_))
        ));
        assert!(matches!(
            validate_masters(&list(&["[2001:db8::1"])),
            Err(ValidationError::Format(_))
        ));
    }

    #[test]
    fn test_ip_sources_fixed_set() {
        assert!(validate_ip_sources(&list(&["host", "docker", "mesos", "netinfo"])).is_ok());
        assert!(matches!(
            validate_ip_sources(&list(&["host", "bogus"])),
            Err(ValidationError::InvalidIpSource(src)) if src == "bogus"
        ));
    }

    #[test]
    fn test_ip_sources_empty_and_duplicates() {
        assert!(matches!(
            validate_ip_sources(&[]),
            Err(ValidationError::EmptyIpSources)
        ));
        assert!(matches!(
            validate_ip_sources(&list(&["host", "host"])),
            Err(ValidationError::Duplicate(_))
        ));
    }
}
