//! Application constants
//!
//! Single source of truth for paths, limits and user-visible markers.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/feasted.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Default location of the durable API key file
pub const DEFAULT_KEYS_PATH: &str = "config/api_keys.json";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Route served by the local proxy
pub const PROXY_ROUTE: &str = "/api/response";

pub const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8080/api/response";

/// Per-model ceiling for one upstream call
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const GENERATING_TEXT: &str = "Generating responses...";
pub const NO_RESPONSE_TEXT: &str = "⚠ No response received";
pub const NO_KEY_TEXT: &str = "⚠ No API key set";
pub const TIMEOUT_TEXT: &str = "⚠ Request timed out (took too long)";
pub const FAILURE_TEXT: &str = "⚠ Something went wrong";

pub const MISSING_FIELDS_BODY: &str = "Missing fields";
pub const INVALID_MODEL_BODY: &str = "Invalid model";
pub const INTERNAL_ERROR_BODY: &str = "An error occurred";
