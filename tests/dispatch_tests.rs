// Dispatch tests - verifying the exact upstream request for every model
//
// A recording transport stands in for the network so each request can be
// inspected without leaving the process.

use async_trait::async_trait;
use feastedchat::model::{
    CompletionBackend, DispatchError, Dispatcher, MODEL_CATALOG, Transport, UpstreamRequest,
    UpstreamResponse,
};
use serde_json::{Value, json};
use std::sync::Mutex;

// ============================================================================
// Recording transport
// ============================================================================

struct Recorder {
    calls: Mutex<Vec<UpstreamRequest>>,
    status: u16,
    body: &'static str,
}

impl Recorder {
    fn answering(status: u16, body: &'static str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status,
            body,
        }
    }

    fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for Recorder {
    async fn send(
        &self,
        _model: &str,
        request: UpstreamRequest,
    ) -> Result<UpstreamResponse, DispatchError> {
        self.calls.lock().unwrap().push(request);
        Ok(UpstreamResponse::new(self.status, self.body.as_bytes()))
    }
}

async fn dispatch_one(model: &str) -> UpstreamRequest {
    let dispatcher = Dispatcher::new(Recorder::answering(200, "{}"));
    dispatcher
        .dispatch(model, "KEY", "Hello")
        .await
        .expect("dispatch");
    let calls = dispatcher.transport().calls();
    assert_eq!(calls.len(), 1, "{model} should issue exactly one call");
    calls.into_iter().next().unwrap()
}

fn chat_messages() -> Value {
    json!([{ "role": "user", "content": "Hello" }])
}

// ============================================================================
// Per-provider requests
// ============================================================================

#[tokio::test]
async fn openai_request() {
    let request = dispatch_one("gpt-4o-mini").await;
    assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
    assert_eq!(request.header("Authorization"), Some("Bearer KEY"));
    assert_eq!(request.header("Content-Type"), Some("application/json"));
    assert_eq!(
        request.body,
        json!({
            "model": "gpt-4o-mini",
            "messages": chat_messages(),
            "temperature": 0.7,
            "max_tokens": 1000
        })
    );
}

#[tokio::test]
async fn anthropic_requests() {
    for (logical, upstream) in [
        ("Claude 3.5 Sonnet", "claude-3-5-sonnet-20241022"),
        ("Claude Haiku", "claude-3-haiku-20240307"),
    ] {
        let request = dispatch_one(logical).await;
        assert_eq!(request.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(request.header("x-api-key"), Some("KEY"));
        assert_eq!(request.header("anthropic-version"), Some("2023-06-01"));
        assert!(request.header("authorization").is_none());
        assert_eq!(
            request.body,
            json!({ "model": upstream, "messages": chat_messages(), "max_tokens": 1000 })
        );
    }
}

#[tokio::test]
async fn grok_request() {
    let request = dispatch_one("Grok2").await;
    assert_eq!(request.url, "https://api.x.ai/v1/chat/completions");
    assert_eq!(request.header("authorization"), Some("Bearer KEY"));
    assert_eq!(
        request.body,
        json!({ "model": "grok-2", "messages": chat_messages(), "max_tokens": 1000 })
    );
}

#[tokio::test]
async fn gemini_request_carries_the_key_in_the_query() {
    let request = dispatch_one("Gemini 1.5 Flash").await;
    assert_eq!(
        request.url,
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=KEY"
    );
    assert!(request.header("authorization").is_none());
    assert_eq!(
        request.body,
        json!({ "contents": [{ "parts": [{ "text": "Hello" }] }] })
    );
}

#[tokio::test]
async fn cohere_request() {
    let request = dispatch_one("Command R+").await;
    assert_eq!(request.url, "https://api.cohere.com/v1/chat");
    assert_eq!(request.header("authorization"), Some("Bearer KEY"));
    assert_eq!(
        request.body,
        json!({ "model": "command-r-plus", "messages": chat_messages() })
    );
}

#[tokio::test]
async fn mistral_request() {
    let request = dispatch_one("Mistral Large").await;
    assert_eq!(request.url, "https://api.mistral.ai/v1/chat/completions");
    assert_eq!(
        request.body,
        json!({ "model": "mistral-large-latest", "messages": chat_messages(), "max_tokens": 1000 })
    );
}

#[tokio::test]
async fn openrouter_requests() {
    for (logical, upstream) in [
        ("OpenRouter", "openai/gpt-3.5-turbo"),
        ("Llama3", "meta-llama/Meta-Llama-3-70B-Instruct"),
        ("Codestral", "mistral/codestral-latest"),
        ("Mixtral 8x7B", "mistral/mixtral-8x7b-instruct"),
        ("Phi-3", "microsoft/phi-3-medium-128k-instruct"),
    ] {
        let request = dispatch_one(logical).await;
        assert_eq!(request.url, "https://openrouter.ai/api/v1/chat/completions");
        assert_eq!(request.header("authorization"), Some("Bearer KEY"));
        assert_eq!(
            request.body,
            json!({ "model": upstream, "messages": chat_messages() })
        );
    }
}

#[tokio::test]
async fn every_catalog_row_dispatches_once() {
    for spec in MODEL_CATALOG {
        let request = dispatch_one(spec.logical_name).await;
        assert_eq!(request.body["model"].as_str().unwrap_or(spec.upstream_model), spec.upstream_model);
    }
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn unknown_model_makes_no_call() {
    let dispatcher = Dispatcher::new(Recorder::answering(200, "{}"));
    let result = dispatcher.dispatch("gpt-5", "KEY", "Hello").await;
    assert!(matches!(result, Err(DispatchError::InvalidModel { model }) if model == "gpt-5"));
    assert!(dispatcher.transport().calls().is_empty());
}

#[tokio::test]
async fn model_names_are_case_sensitive() {
    let dispatcher = Dispatcher::new(Recorder::answering(200, "{}"));
    let result = dispatcher.dispatch("grok2", "KEY", "Hello").await;
    assert!(matches!(result, Err(DispatchError::InvalidModel { .. })));
    assert!(dispatcher.transport().calls().is_empty());
}

#[tokio::test]
async fn missing_fields_make_no_call() {
    let dispatcher = Dispatcher::new(Recorder::answering(200, "{}"));
    for (model, apikey, prompt) in [
        ("", "KEY", "Hello"),
        ("Grok2", "", "Hello"),
        ("Grok2", "KEY", ""),
        ("not-a-model", "", "Hello"),
    ] {
        let result = dispatcher.dispatch(model, apikey, prompt).await;
        assert!(
            matches!(result, Err(DispatchError::MissingFields)),
            "({model:?}, {apikey:?}, {prompt:?}) should be missing fields"
        );
    }
    assert!(dispatcher.transport().calls().is_empty());
}

// ============================================================================
// Upstream responses
// ============================================================================

#[tokio::test]
async fn error_statuses_are_returned_not_raised() {
    let dispatcher = Dispatcher::new(Recorder::answering(401, r#"{"error":"bad key"}"#));
    let response = dispatcher
        .dispatch("Grok2", "KEY", "Hello")
        .await
        .expect("dispatch");
    assert_eq!(response.status, 401);
    assert_eq!(response.json().unwrap(), json!({ "error": "bad key" }));
}

#[tokio::test]
async fn in_process_backend_parses_the_body() {
    let dispatcher = Dispatcher::new(Recorder::answering(
        200,
        r#"{"choices":[{"message":{"content":"Hi"}}]}"#,
    ));
    let value = dispatcher
        .complete("gpt-4o-mini", "KEY", "Hello")
        .await
        .expect("complete");
    assert_eq!(feastedchat::model::normalize(&value), "Hi");
}

#[tokio::test]
async fn in_process_backend_rejects_non_json() {
    let dispatcher = Dispatcher::new(Recorder::answering(502, "<html>bad gateway</html>"));
    let result = dispatcher.complete("gpt-4o-mini", "KEY", "Hello").await;
    assert!(result.is_err());
}
