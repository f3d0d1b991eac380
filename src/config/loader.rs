use super::CONFIG_PATH;
use super::app::{AppConfig, KeySettings, RoundSettings, ServerSettings};
use super::error::ConfigError;
use crate::constants::ENV_PATH;
use dotenvy::from_filename;
use serde::Deserialize;
use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::{debug, info};

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub server: RawServer,
    #[serde(default)]
    pub round: RawRound,
    #[serde(default)]
    pub keys: RawKeys,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawServer {
    pub bind: Option<String>,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawRound {
    pub timeout_ms: Option<u64>,
    pub proxy_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub(super) struct RawKeys {
    pub path: Option<String>,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration. Without an explicit path a missing
/// default file means built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    match path {
        Some(path) => read_config(path),
        None => match read_config(Path::new(CONFIG_PATH)) {
            Err(ConfigError::NotFound { path }) => {
                info!(path = %path.display(), "No configuration file, using defaults");
                Ok(AppConfig::default())
            }
            other => other,
        },
    }
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    debug!(path = %path.display(), "Reading configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(path, &content)
}

pub(super) fn parse_config(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_and_build(parsed)
}

fn validate_and_build(parsed: RawConfig) -> Result<AppConfig, ConfigError> {
    let mut server = ServerSettings::default();
    if let Some(bind) = parsed.server.bind {
        server.bind = bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBind { value: bind })?;
    }
    server.allowed_origins = parsed.server.allowed_origins;

    let mut round = RoundSettings::default();
    if let Some(timeout_ms) = parsed.round.timeout_ms {
        if timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        round.timeout = Duration::from_millis(timeout_ms);
    }
    if let Some(proxy_url) = parsed.round.proxy_url {
        if reqwest::Url::parse(&proxy_url).is_err() {
            return Err(ConfigError::InvalidProxyUrl { value: proxy_url });
        }
        round.proxy_url = proxy_url;
    }

    let mut keys = KeySettings::default();
    if let Some(raw_path) = parsed.keys.path {
        keys.path = expand_path(&raw_path)?;
    }

    Ok(AppConfig {
        server,
        round,
        keys,
    })
}

fn expand_path(raw: &str) -> Result<PathBuf, ConfigError> {
    shellexpand::full(raw)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|error| ConfigError::InvalidKeysPath {
            value: raw.to_string(),
            reason: error.to_string(),
        })
}
