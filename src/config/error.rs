use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found at {path:?}")]
    NotFound { path: PathBuf },

    #[error("failed to read config from {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config from {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("server.bind '{value}' is not a valid socket address")]
    InvalidBind { value: String },

    #[error("round.timeout_ms must be greater than zero")]
    InvalidTimeout,

    #[error("round.proxy_url '{value}' is not a valid URL")]
    InvalidProxyUrl { value: String },

    #[error("keys.path '{value}' could not be expanded: {reason}")]
    InvalidKeysPath { value: String, reason: String },
}
