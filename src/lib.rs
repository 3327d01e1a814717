pub mod config;
pub mod error;
pub mod labels;
pub mod validation;

pub use config::Config;
pub use labels::{domain_frag, rfc952_label, rfc1123_label};
