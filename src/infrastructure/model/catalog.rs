//! # Model Catalog
//!
//! Static table mapping each logical model identifier to its upstream
//! endpoint, authentication scheme and request envelope. Adding a provider
//! means adding a row to [`MODEL_CATALOG`].
//!
//! | Logical name | Upstream | Auth |
//! |--------------|----------|------|
//! | `gpt-4o-mini` | OpenAI chat completions | Bearer |
//! | `Claude 3.5 Sonnet`, `Claude Haiku` | Anthropic messages | `x-api-key` |
//! | `Grok2` | x.ai chat completions | Bearer |
//! | `Gemini 1.5 Flash` | Google generativelanguage | `?key=` query |
//! | `Command R+` | Cohere chat | Bearer |
//! | `Mistral Large` | Mistral chat completions | Bearer |
//! | `OpenRouter`, `Llama3`, `Codestral`, `Mixtral 8x7B`, `Phi-3` | OpenRouter | Bearer |

use serde::Serialize;
use serde_json::{Map, Value, json};
use utoipa::ToSchema;

use super::adapter::MessageAdapter;
use super::types::UpstreamRequest;
use crate::constants::{ANTHROPIC_VERSION, DEFAULT_MAX_TOKENS};
use crate::types::ChatMessage;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const ANTHROPIC_MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const XAI_CHAT_URL: &str = "https://api.x.ai/v1/chat/completions";
const GEMINI_FLASH_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const COHERE_CHAT_URL: &str = "https://api.cohere.com/v1/chat";
const MISTRAL_CHAT_URL: &str = "https://api.mistral.ai/v1/chat/completions";
const OPENROUTER_CHAT_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// How the API key travels to the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `x-api-key: <key>` plus a pinned `anthropic-version`
    AnthropicKey,
    /// `?key=<key>` appended to the endpoint, no auth header
    QueryKey,
}

/// Shape of the JSON body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope {
    /// `{model, messages, [temperature], [max_tokens]}`
    Chat {
        temperature: Option<f64>,
        max_tokens: Option<u32>,
    },
    /// `{contents: [{parts: [{text}]}]}`
    GeminiContents,
}

/// One supported logical model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelSpec {
    pub logical_name: &'static str,
    pub upstream_model: &'static str,
    pub endpoint: &'static str,
    pub auth: AuthScheme,
    pub envelope: Envelope,
}

const fn chat(max_tokens: Option<u32>) -> Envelope {
    Envelope::Chat {
        temperature: None,
        max_tokens,
    }
}

const fn openrouter(logical_name: &'static str, upstream_model: &'static str) -> ModelSpec {
    ModelSpec {
        logical_name,
        upstream_model,
        endpoint: OPENROUTER_CHAT_URL,
        auth: AuthScheme::Bearer,
        envelope: chat(None),
    }
}

pub static MODEL_CATALOG: &[ModelSpec] = &[
    ModelSpec {
        logical_name: "gpt-4o-mini",
        upstream_model: "gpt-4o-mini",
        endpoint: OPENAI_CHAT_URL,
        auth: AuthScheme::Bearer,
        envelope: Envelope::Chat {
            temperature: Some(0.7),
            max_tokens: Some(DEFAULT_MAX_TOKENS),
        },
    },
    ModelSpec {
        logical_name: "Claude 3.5 Sonnet",
        upstream_model: "claude-3-5-sonnet-20241022",
        endpoint: ANTHROPIC_MESSAGES_URL,
        auth: AuthScheme::AnthropicKey,
        envelope: chat(Some(DEFAULT_MAX_TOKENS)),
    },
    ModelSpec {
        logical_name: "Claude Haiku",
        upstream_model: "claude-3-haiku-20240307",
        endpoint: ANTHROPIC_MESSAGES_URL,
        auth: AuthScheme::AnthropicKey,
        envelope: chat(Some(DEFAULT_MAX_TOKENS)),
    },
    ModelSpec {
        logical_name: "Grok2",
        upstream_model: "grok-2",
        endpoint: XAI_CHAT_URL,
        auth: AuthScheme::Bearer,
        envelope: chat(Some(DEFAULT_MAX_TOKENS)),
    },
    ModelSpec {
        logical_name: "Gemini 1.5 Flash",
        upstream_model: "gemini-1.5-flash",
        endpoint: GEMINI_FLASH_URL,
        auth: AuthScheme::QueryKey,
        envelope: Envelope::GeminiContents,
    },
    ModelSpec {
        logical_name: "Command R+",
        upstream_model: "command-r-plus",
        endpoint: COHERE_CHAT_URL,
        auth: AuthScheme::Bearer,
        envelope: chat(None),
    },
    ModelSpec {
        logical_name: "Mistral Large",
        upstream_model: "mistral-large-latest",
        endpoint: MISTRAL_CHAT_URL,
        auth: AuthScheme::Bearer,
        envelope: chat(Some(DEFAULT_MAX_TOKENS)),
    },
    openrouter("OpenRouter", "openai/gpt-3.5-turbo"),
    openrouter("Llama3", "meta-llama/Meta-Llama-3-70B-Instruct"),
    openrouter("Codestral", "mistral/codestral-latest"),
    openrouter("Mixtral 8x7B", "mistral/mixtral-8x7b-instruct"),
    openrouter("Phi-3", "microsoft/phi-3-medium-128k-instruct"),
];

/// Find the row for a logical model name. Matching is exact.
pub fn lookup(logical_name: &str) -> Option<&'static ModelSpec> {
    MODEL_CATALOG
        .iter()
        .find(|spec| spec.logical_name == logical_name)
}

impl ModelSpec {
    /// Build the complete upstream request for a single user prompt.
    pub fn build_request(&self, prompt: &str, apikey: &str) -> UpstreamRequest {
        let messages = [ChatMessage::user(prompt)];
        UpstreamRequest {
            url: self.url(apikey),
            headers: self.headers(apikey),
            body: self.body(&messages),
        }
    }

    fn url(&self, apikey: &str) -> String {
        match self.auth {
            AuthScheme::QueryKey => match reqwest::Url::parse_with_params(
                self.endpoint,
                &[("key", apikey)],
            ) {
                Ok(url) => url.to_string(),
                Err(_) => format!("{}?key={apikey}", self.endpoint),
            },
            AuthScheme::Bearer | AuthScheme::AnthropicKey => self.endpoint.to_string(),
        }
    }

    fn headers(&self, apikey: &str) -> Vec<(String, String)> {
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        match self.auth {
            AuthScheme::Bearer => {
                headers.push(("Authorization".to_string(), format!("Bearer {apikey}")));
            }
            AuthScheme::AnthropicKey => {
                headers.push(("x-api-key".to_string(), apikey.to_string()));
                headers.push((
                    "anthropic-version".to_string(),
                    ANTHROPIC_VERSION.to_string(),
                ));
            }
            AuthScheme::QueryKey => {}
        }
        headers
    }

    fn body(&self, messages: &[ChatMessage]) -> Value {
        match self.envelope {
            Envelope::Chat {
                temperature,
                max_tokens,
            } => {
                let mut body = Map::new();
                body.insert("model".into(), json!(self.upstream_model));
                body.insert(
                    "messages".into(),
                    Value::Array(MessageAdapter::to_openai_format(messages)),
                );
                if let Some(temperature) = temperature {
                    body.insert("temperature".into(), json!(temperature));
                }
                if let Some(max_tokens) = max_tokens {
                    body.insert("max_tokens".into(), json!(max_tokens));
                }
                Value::Object(body)
            }
            Envelope::GeminiContents => json!({
                "contents": MessageAdapter::to_gemini_contents(messages)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn logical_names_are_unique() {
        let names: HashSet<_> = MODEL_CATALOG.iter().map(|s| s.logical_name).collect();
        assert_eq!(names.len(), MODEL_CATALOG.len());
        assert_eq!(MODEL_CATALOG.len(), 12);
    }

    #[test]
    fn lookup_is_exact() {
        assert!(lookup("Grok2").is_some());
        assert!(lookup("grok2").is_none());
        assert!(lookup(" Grok2").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn gemini_key_goes_into_the_query() {
        let spec = lookup("Gemini 1.5 Flash").unwrap();
        let request = spec.build_request("hi", "abc123");
        assert_eq!(
            request.url,
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=abc123"
        );
        assert!(request.header("authorization").is_none());
        assert!(request.header("x-api-key").is_none());
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[test]
    fn gemini_key_is_url_encoded() {
        let spec = lookup("Gemini 1.5 Flash").unwrap();
        let request = spec.build_request("hi", "a&b");
        assert!(request.url.ends_with("?key=a%26b"));
    }

    #[test]
    fn openai_body_carries_temperature() {
        let request = lookup("gpt-4o-mini").unwrap().build_request("hi", "k");
        assert_eq!(request.body["temperature"], json!(0.7));
        assert_eq!(request.body["max_tokens"], json!(1000));
    }

    #[test]
    fn openrouter_rows_share_the_gateway() {
        for name in ["OpenRouter", "Llama3", "Codestral", "Mixtral 8x7B", "Phi-3"] {
            let spec = lookup(name).unwrap();
            assert_eq!(spec.endpoint, OPENROUTER_CHAT_URL);
            let request = spec.build_request("hi", "k");
            let keys: Vec<_> = request.body.as_object().unwrap().keys().cloned().collect();
            assert_eq!(keys.len(), 2, "{name} body should only carry model and messages");
        }
    }
}
