//! Model types - upstream request/response envelopes and error types

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Fully materialized upstream call: everything a transport needs to send it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl UpstreamRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Whatever the upstream answered, unexamined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Dispatcher errors
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("model, apikey and prompt are all required")]
    MissingFields,
    #[error("model '{model}' is not supported")]
    InvalidModel { model: String },
    #[error("network error calling '{model}': {source}")]
    Network {
        model: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("upstream call for '{model}' failed: {reason}")]
    Upstream { model: String, reason: String },
}

impl DispatchError {
    pub fn invalid_model(model: impl Into<String>) -> Self {
        Self::InvalidModel {
            model: model.into(),
        }
    }

    pub fn network(model: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            model: model.into(),
            source,
        }
    }

    pub fn upstream(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Upstream {
            model: model.into(),
            reason: reason.into(),
        }
    }
}

/// Failures of a single completion attempt, as seen by the orchestration loop.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("proxy request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("request failed with status {status}")]
    Status { status: u16 },
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Dispatch(DispatchError::InvalidModel { model }) => {
                format!("Model '{model}' is not supported by the proxy.")
            }
            BackendError::Dispatch(DispatchError::MissingFields) => {
                "The request was missing a model, key or prompt.".to_string()
            }
            BackendError::Dispatch(_) => "Could not reach the model provider.".to_string(),
            BackendError::Http(source) => {
                if source.is_connect() {
                    "Could not connect to the local proxy.".to_string()
                } else {
                    "Network error while talking to the local proxy.".to_string()
                }
            }
            BackendError::Status { status } => match StatusCode::from_u16(*status) {
                Ok(StatusCode::BAD_REQUEST) => "The proxy rejected the request.".to_string(),
                Ok(code) if code.is_server_error() => {
                    format!("The proxy failed with status {status}.")
                }
                _ => format!("Request failed: {status}"),
            },
            BackendError::Decode(_) => "The response was not valid JSON.".to_string(),
        }
    }
}
