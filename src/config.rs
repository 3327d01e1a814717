use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::labels::{self, SEP};
use crate::validation;

/// Service-discovery DNS configuration, deserialized from config.json.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Mesos master host:port pairs to poll for state.
    pub masters: Vec<String>,

    /// Zookeeper connection string for master discovery (alternative to
    /// listing masters explicitly).
    pub zk: String,

    /// Upstream resolvers for out-of-domain queries, IP or IP:port.
    pub resolvers: Vec<String>,

    /// Where task IPs are looked up, in priority order.
    pub ip_sources: Vec<String>,

    /// Domain suffix served for discovered tasks.
    pub domain: String,

    /// Whether the DNS server is enabled.
    pub dns_on: bool,

    /// Whether the HTTP API server is enabled.
    pub http_on: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            masters: vec![],
            zk: String::new(),
            resolvers: vec![],
            ip_sources: vec!["netinfo".to_string(), "host".to_string()],
            domain: "mesos".to_string(),
            dns_on: true,
            http_on: true,
        }
    }
}

impl Config {
    /// Loads the configuration from a JSON file, sanitizes the served
    /// domain and validates the result.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&raw)?;

        let mangled = labels::domain_frag(&config.domain, SEP, labels::rfc1123_label);
        if mangled.is_empty() {
            return Err(ConfigError::EmptyDomain(config.domain));
        }
        if mangled != config.domain {
            warn!(from = %config.domain, to = %mangled, "sanitized configured domain");
            config.domain = mangled;
        }

        config.validate()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Validates the configuration as a whole. The first failure aborts;
    /// callers decide whether startup proceeds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dns_on && !self.http_on {
            return Err(ConfigError::NoServiceEnabled);
        }
        if self.masters.is_empty() && self.zk.is_empty() {
            return Err(ConfigError::NoMasterSource);
        }
        validation::validate_masters(&self.masters).map_err(ConfigError::Masters)?;
        validation::validate_resolvers(&self.resolvers).map_err(ConfigError::Resolvers)?;
        validation::validate_ip_sources(&self.ip_sources).map_err(ConfigError::IpSources)?;
        Ok(())
    }
}
