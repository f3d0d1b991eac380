//! API key storage
//!
//! Keys are saved per provider id, either for the current session only or
//! durably in a JSON object file (`{"openai": "sk-...", ...}`). A round never
//! reads the vault directly: it works from an [`ApiKeys`] snapshot taken when
//! the round starts.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use super::selection::MODEL_SLOTS;

/// Provider ids accepted by the settings commands, with display labels.
pub static PROVIDERS: &[(&str, &str)] = &[
    ("openai", "OpenAI"),
    ("claude", "Claude"),
    ("gemini", "Gemini"),
    ("grok2", "Grok"),
    ("commandR", "CommandR"),
    ("mistral", "Mistral"),
    ("openrouter", "OpenRouter"),
    ("llama3", "Llama3"),
    ("codestral", "Codestral"),
    ("mixtral", "Mixtral"),
    ("phi3", "Phi3"),
    ("claude_haiku", "Claude Haiku"),
];

/// Provider ids whose model key differs from the provider id.
static PROVIDER_ALIASES: &[(&str, &str)] = &[("openai", "gpt-4o-mini")];

/// Narrow read capability the round needs.
pub trait SecretStore: Send + Sync {
    fn get(&self, model_key: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("unknown provider '{provider}'")]
    UnknownProvider { provider: String },
    #[error("failed to access key file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("key file {path:?} is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Where a saved key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Forgotten when the process exits
    Session,
    /// Written to the key file
    Durable,
}

/// Resolve a provider id, also accepting a model key that has an alias.
pub fn provider_for(name: &str) -> Option<&'static str> {
    PROVIDERS
        .iter()
        .map(|(id, _)| *id)
        .find(|id| *id == name)
        .or_else(|| {
            PROVIDER_ALIASES
                .iter()
                .find(|(_, model_key)| *model_key == name)
                .map(|(provider, _)| *provider)
        })
}

pub fn provider_label(provider: &str) -> &str {
    PROVIDERS
        .iter()
        .find(|(id, _)| *id == provider)
        .map(|(_, label)| *label)
        .unwrap_or(provider)
}

fn model_key_for(provider: &str) -> &str {
    PROVIDER_ALIASES
        .iter()
        .find(|(id, _)| *id == provider)
        .map(|(_, model_key)| *model_key)
        .unwrap_or(provider)
}

/// Read-only key snapshot, keyed by model key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiKeys {
    keys: HashMap<String, String>,
}

impl ApiKeys {
    /// Map stored provider entries onto model keys. Direct model-key matches
    /// win over provider aliases; empty values never count.
    pub fn from_stored(stored: &BTreeMap<String, String>) -> Self {
        let mut keys = HashMap::new();

        for slot in MODEL_SLOTS {
            if let Some(value) = stored.get(slot.key).filter(|v| !v.is_empty()) {
                keys.insert(slot.key.to_string(), value.clone());
            }
        }

        for (provider, value) in stored {
            let model_key = model_key_for(provider);
            if !value.is_empty() && !keys.contains_key(model_key) {
                keys.insert(model_key.to_string(), value.clone());
            }
        }

        Self { keys }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SecretStore for ApiKeys {
    fn get(&self, model_key: &str) -> Option<String> {
        self.keys.get(model_key).filter(|v| !v.is_empty()).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ApiKeys {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Session layer over a durable key file.
#[derive(Debug)]
pub struct KeyVault {
    path: PathBuf,
    session: BTreeMap<String, String>,
}

impl KeyVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            session: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durable entries overlaid with non-empty session entries.
    pub fn stored(&self) -> Result<BTreeMap<String, String>, KeyStoreError> {
        let mut stored = self.read_durable()?;
        for (provider, value) in &self.session {
            if !value.is_empty() {
                stored.insert(provider.clone(), value.clone());
            }
        }
        Ok(stored)
    }

    /// Snapshot for a round. An unreadable key file counts as no keys.
    pub fn snapshot(&self) -> ApiKeys {
        match self.stored() {
            Ok(stored) => ApiKeys::from_stored(&stored),
            Err(error) => {
                warn!(%error, "Failed to load API keys, continuing without any");
                ApiKeys::default()
            }
        }
    }

    pub fn save(
        &mut self,
        provider: &str,
        secret: &str,
        scope: KeyScope,
    ) -> Result<&'static str, KeyStoreError> {
        let provider = provider_for(provider).ok_or_else(|| KeyStoreError::UnknownProvider {
            provider: provider.to_string(),
        })?;

        match scope {
            KeyScope::Session => {
                self.session
                    .insert(provider.to_string(), secret.to_string());
                info!(provider, "API key saved for this session");
            }
            KeyScope::Durable => {
                let mut durable = self.read_durable()?;
                durable.insert(provider.to_string(), secret.to_string());
                self.write_durable(&durable)?;
                info!(provider, path = %self.path.display(), "API key saved permanently");
            }
        }
        Ok(provider)
    }

    /// Blank the durable entry and drop any session entry.
    pub fn clear(&mut self, provider: &str) -> Result<&'static str, KeyStoreError> {
        let provider = provider_for(provider).ok_or_else(|| KeyStoreError::UnknownProvider {
            provider: provider.to_string(),
        })?;

        self.session.remove(provider);
        let mut durable = self.read_durable()?;
        durable.insert(provider.to_string(), String::new());
        self.write_durable(&durable)?;
        info!(provider, "API key cleared");
        Ok(provider)
    }

    fn read_durable(&self) -> Result<BTreeMap<String, String>, KeyStoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No key file yet");
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(KeyStoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|source| KeyStoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_durable(&self, keys: &BTreeMap<String, String>) -> Result<(), KeyStoreError> {
        let io_error = |source| KeyStoreError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let serialized = serde_json::to_string_pretty(keys).map_err(|source| {
            KeyStoreError::Parse {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, serialized).map_err(io_error)
    }
}
