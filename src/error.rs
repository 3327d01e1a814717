use thiserror::Error;

use crate::validation::ValidationError;

/// Errors raised while loading and validating the service configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("either DNS or HTTP server should be on")]
    NoServiceEnabled,

    #[error("specify masters or zookeeper in the config")]
    NoMasterSource,

    #[error("domain {0:?} contains no usable labels")]
    EmptyDomain(String),

    #[error("error validating masters: {0}")]
    Masters(ValidationError),

    #[error("error validating resolvers: {0}")]
    Resolvers(ValidationError),

    #[error("error validating ip sources: {0}")]
    IpSources(ValidationError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
