//! Response normalization
//!
//! Pulls a flat text answer out of whichever provider-specific JSON shape came
//! back. Shapes are tried in a fixed order and the first non-empty string
//! wins:
//!
//! 1. `choices[0].message.content` (OpenAI-compatible)
//! 2. `output_text`
//! 3. `candidates[0].content.parts[0].text` (Gemini)
//! 4. `response`
//! 5. `text`
//! 6. `content[0].text` (Anthropic messages)

use serde_json::Value;

use crate::constants::NO_RESPONSE_TEXT;

type Extractor = fn(&Value) -> Option<&Value>;

const EXTRACTORS: &[Extractor] = &[
    |v| v.get("choices")?.get(0)?.get("message")?.get("content"),
    |v| v.get("output_text"),
    |v| {
        v.get("candidates")?
            .get(0)?
            .get("content")?
            .get("parts")?
            .get(0)?
            .get("text")
    },
    |v| v.get("response"),
    |v| v.get("text"),
    |v| v.get("content")?.get(0)?.get("text"),
];

/// First usable text in priority order, if any.
pub fn extract_text(payload: &Value) -> Option<&str> {
    EXTRACTORS
        .iter()
        .filter_map(|extract| extract(payload))
        .filter_map(Value::as_str)
        .find(|text| !text.is_empty())
}

/// Text answer or the fixed "no response" sentinel. Never fails.
pub fn normalize(payload: &Value) -> String {
    extract_text(payload)
        .unwrap_or(NO_RESPONSE_TEXT)
        .to_string()
}
