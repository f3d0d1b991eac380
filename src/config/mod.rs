pub mod app;
pub mod error;
pub mod loader;

pub use crate::constants::CONFIG_PATH;
pub use app::{AppConfig, KeySettings, RoundSettings, ServerSettings};
pub use error::ConfigError;
