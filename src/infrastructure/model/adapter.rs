//! Message adapters - convert chat messages into provider wire formats

use crate::types::ChatMessage;
use serde_json::{Value, json};

/// Adapter for converting messages to different API formats
pub struct MessageAdapter;

impl MessageAdapter {
    /// Convert messages to OpenAI-style format
    /// Returns: [{"role": "...", "content": "..."}]
    ///
    /// Anthropic Messages, Cohere chat, Mistral, x.ai and OpenRouter all
    /// accept this shape.
    pub fn to_openai_format(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| {
                json!({
                    "role": msg.role.as_str(),
                    "content": msg.content.clone()
                })
            })
            .collect()
    }

    /// Convert messages to Gemini `contents`
    /// Returns: [{"parts": [{"text": "..."}]}]
    pub fn to_gemini_contents(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| json!({ "parts": [{ "text": msg.content.clone() }] }))
            .collect()
    }
}
