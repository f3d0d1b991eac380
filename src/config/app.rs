use super::error::ConfigError;
use crate::constants::{DEFAULT_BIND, DEFAULT_KEYS_PATH, DEFAULT_PROXY_URL, DEFAULT_TIMEOUT_MS};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration loaded from feasted.toml
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub round: RoundSettings,
    pub keys: KeySettings,
}

/// `[server]` - where the local proxy listens
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
    /// CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND
                .parse()
                .unwrap_or(SocketAddr::from((Ipv4Addr::LOCALHOST, 8080))),
            allowed_origins: Vec::new(),
        }
    }
}

/// `[round]` - how the terminal client runs a generation round
#[derive(Debug, Clone)]
pub struct RoundSettings {
    pub timeout: Duration,
    pub proxy_url: String,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            proxy_url: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

/// `[keys]` - durable API key file
#[derive(Debug, Clone)]
pub struct KeySettings {
    pub path: PathBuf,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_KEYS_PATH),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text without touching the filesystem
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(Path::new("<inline>"), content)
    }
}
