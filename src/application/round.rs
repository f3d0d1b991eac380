//! Generation rounds
//!
//! A round sends the session prompt to every enabled model, one model at a
//! time, and leaves exactly one [`ResultEntry`] per enabled model behind. A
//! missing key, a timeout or a failed call only affects that model's slot.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::keystore::SecretStore;
use super::selection::{ModelSelection, ModelSlot};
use crate::constants::{FAILURE_TEXT, GENERATING_TEXT, NO_KEY_TEXT, TIMEOUT_TEXT};
use crate::model::{CompletionBackend, normalize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Generating,
}

/// What happened to one model in a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Normalized answer, possibly the "no response" sentinel
    Text(String),
    MissingKey,
    TimedOut,
    /// Any other failure, with a user-facing reason
    Failed(String),
}

impl EntryOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, EntryOutcome::TimedOut | EntryOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub model_key: &'static str,
    pub outcome: EntryOutcome,
    pub finished_at: DateTime<Utc>,
}

impl ResultEntry {
    /// Text shown in the model's result panel.
    pub fn text(&self) -> &str {
        match &self.outcome {
            EntryOutcome::Text(text) => text,
            EntryOutcome::MissingKey => NO_KEY_TEXT,
            EntryOutcome::TimedOut => TIMEOUT_TEXT,
            EntryOutcome::Failed(_) => FAILURE_TEXT,
        }
    }

    /// Why the call failed, for entries that failed with a known cause.
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            EntryOutcome::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Transient notification raised during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            detail: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            detail: None,
        }
    }

    /// Emitted once when a round starts.
    pub fn generating() -> Self {
        Self::info(GENERATING_TEXT)
    }

    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            detail: Some(detail.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round_id: Uuid,
    pub entries: Vec<ResultEntry>,
    pub notices: Vec<Notice>,
}

/// Rejections raised before any network activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error("Please enter a prompt before generating")]
    EmptyPrompt,
    #[error("Select at least one model to generate responses")]
    NoModelsSelected,
}

/// Client-side state carried between rounds.
#[derive(Debug, Default)]
pub struct Session {
    pub prompt: String,
    pub selection: ModelSelection,
    results: HashMap<&'static str, ResultEntry>,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks a round would start: a non-blank prompt and at least one model.
    pub fn ready(&self) -> Result<(), RoundError> {
        if self.prompt.trim().is_empty() {
            return Err(RoundError::EmptyPrompt);
        }
        if self.selection.is_empty() {
            return Err(RoundError::NoModelsSelected);
        }
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn result(&self, model_key: &str) -> Option<&ResultEntry> {
        self.results.get(model_key)
    }

    /// Results of the currently enabled models, in enable order.
    pub fn visible_results(&self) -> Vec<&ResultEntry> {
        self.selection
            .enabled()
            .into_iter()
            .filter_map(|slot| self.results.get(slot.key))
            .collect()
    }
}

/// Runs rounds against a completion backend with a per-call ceiling.
pub struct RoundRunner<B> {
    backend: B,
    timeout: Duration,
}

impl<B: CompletionBackend> RoundRunner<B> {
    pub fn new(backend: B, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one round. The enabled list is fixed when the round starts and
    /// models are processed strictly one after another.
    pub async fn run(
        &self,
        session: &mut Session,
        keys: &dyn SecretStore,
    ) -> Result<RoundReport, RoundError> {
        session.ready()?;
        let enabled = session.selection.enabled();

        let round_id = Uuid::new_v4();
        let prompt = session.prompt.clone();
        info!(round = %round_id, models = enabled.len(), "Starting generation round");

        session.phase = Phase::Generating;
        session.results.clear();
        let mut entries = Vec::with_capacity(enabled.len());
        let mut notices = vec![Notice::generating()];

        for slot in enabled {
            let outcome = self.run_model(slot, keys, &prompt).await;
            match &outcome {
                EntryOutcome::TimedOut => {
                    notices.push(Notice::error(format!("{} failed", slot.key), "Request timed out"));
                }
                EntryOutcome::Failed(_) => {
                    notices.push(Notice::error(format!("{} failed", slot.key), "Please try again."));
                }
                EntryOutcome::Text(_) | EntryOutcome::MissingKey => {}
            }

            let entry = ResultEntry {
                model_key: slot.key,
                outcome,
                finished_at: Utc::now(),
            };
            session.results.insert(slot.key, entry.clone());
            entries.push(entry);
        }

        session.phase = Phase::Idle;
        let failures = entries.iter().filter(|e| e.outcome.is_failure()).count();
        info!(round = %round_id, failures, "Generation round finished");

        Ok(RoundReport {
            round_id,
            entries,
            notices,
        })
    }

    async fn run_model(
        &self,
        slot: &ModelSlot,
        keys: &dyn SecretStore,
        prompt: &str,
    ) -> EntryOutcome {
        let Some(apikey) = keys.get(slot.key) else {
            debug!(model = slot.key, "No API key stored, skipping");
            return EntryOutcome::MissingKey;
        };

        let call = self.backend.complete(slot.logical_name, &apikey, prompt);
        match timeout(self.timeout, call).await {
            Ok(Ok(payload)) => {
                debug!(model = slot.key, "Model answered");
                EntryOutcome::Text(normalize(&payload))
            }
            Ok(Err(error)) => {
                let reason = error.user_message();
                warn!(model = slot.key, %error, reason = reason.as_str(), "Model call failed");
                EntryOutcome::Failed(reason)
            }
            Err(_) => {
                warn!(
                    model = slot.key,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Model call timed out"
                );
                EntryOutcome::TimedOut
            }
        }
    }
}
