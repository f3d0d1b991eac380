// Proxy client tests - ProxyClient against a live router on an ephemeral port
//
// The router runs over a real socket so the client's headers, body and
// status handling all go through reqwest.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use feastedchat::config::ServerSettings;
use feastedchat::keystore::ApiKeys;
use feastedchat::model::{
    BackendError, CompletionBackend, DispatchError, Dispatcher, ProxyClient, Transport,
    UpstreamRequest, UpstreamResponse,
};
use feastedchat::round::{EntryOutcome, RoundRunner, Session};
use feastedchat::server::{self, ServerError};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

// ============================================================================
// Helpers
// ============================================================================

/// Answers per logical model name; anything else is a 200 with `{}`.
struct ScriptedUpstream {
    answers: Vec<(&'static str, u16, &'static str)>,
}

#[async_trait]
impl Transport for ScriptedUpstream {
    async fn send(
        &self,
        model: &str,
        _request: UpstreamRequest,
    ) -> Result<UpstreamResponse, DispatchError> {
        let (status, body) = self
            .answers
            .iter()
            .find(|(name, _, _)| *name == model)
            .map(|(_, status, body)| (*status, *body))
            .unwrap_or((200, "{}"));
        Ok(UpstreamResponse::new(status, body.as_bytes()))
    }
}

async fn spawn_proxy(answers: Vec<(&'static str, u16, &'static str)>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let dispatcher = Arc::new(Dispatcher::new(ScriptedUpstream { answers }));
    tokio::spawn(async move {
        let _ = server::serve_on(listener, dispatcher, &[]).await;
    });
    addr
}

async fn spawn_router(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

fn proxy_url(addr: SocketAddr) -> String {
    format!("http://{addr}/api/response")
}

// ============================================================================
// Rounds through the proxy
// ============================================================================

#[tokio::test]
async fn round_through_the_proxy() {
    let addr = spawn_proxy(vec![
        ("gpt-4o-mini", 200, r#"{"choices":[{"message":{"content":"ok"}}]}"#),
        ("Grok2", 401, r#"{"error":{"message":"bad key"}}"#),
    ])
    .await;
    let runner = RoundRunner::new(ProxyClient::new(proxy_url(addr)), Duration::from_secs(15));

    let mut session = Session::new();
    session.prompt = "Hello".to_string();
    session.selection.toggle("gpt-4o-mini");
    session.selection.toggle("grok2");
    let keys: ApiKeys = [("gpt-4o-mini", "sk"), ("grok2", "xai")].into_iter().collect();

    let report = runner.run(&mut session, &keys).await.expect("round");

    assert_eq!(report.entries.len(), 2);
    assert_eq!(
        session.result("gpt-4o-mini").unwrap().outcome,
        EntryOutcome::Text("ok".to_string())
    );
    // the upstream 401 body is relayed with 200 and carries no answer text
    assert_eq!(
        session.result("grok2").unwrap().outcome,
        EntryOutcome::Text("⚠ No response received".to_string())
    );
}

#[tokio::test]
async fn invalid_model_is_a_status_failure() {
    let addr = spawn_proxy(vec![]).await;
    let client = ProxyClient::new(proxy_url(addr));

    let error = client.complete("gpt-5", "KEY", "Hello").await.unwrap_err();
    assert!(matches!(error, BackendError::Status { status: 400 }));
    assert_eq!(error.user_message(), "The proxy rejected the request.");
}

#[tokio::test]
async fn non_json_upstream_becomes_a_server_error() {
    let addr = spawn_proxy(vec![("Mistral Large", 502, "<html>Bad Gateway</html>")]).await;
    let client = ProxyClient::new(proxy_url(addr));

    let error = client
        .complete("Mistral Large", "KEY", "Hello")
        .await
        .unwrap_err();
    assert!(matches!(error, BackendError::Status { status: 500 }));
    assert_eq!(error.user_message(), "The proxy failed with status 500.");
}

// ============================================================================
// Wire format
// ============================================================================

#[tokio::test]
async fn sends_bearer_token_and_json_body() {
    let router = Router::new().route(
        "/api/response",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            let authorization = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            Json(json!({ "authorization": authorization, "body": body }))
        }),
    );
    let addr = spawn_router(router).await;
    let client = ProxyClient::new(proxy_url(addr));

    let echoed = client
        .complete("Phi-3", "KEY-1", "Why?")
        .await
        .expect("complete");
    assert_eq!(echoed["authorization"], "Bearer KEY-1");
    assert_eq!(
        echoed["body"],
        json!({ "model": "Phi-3", "apikey": "KEY-1", "prompt": "Why?" })
    );
}

#[tokio::test]
async fn non_json_success_body_is_a_decode_failure() {
    let router = Router::new().route("/api/response", post(|| async { "plain text" }));
    let addr = spawn_router(router).await;
    let client = ProxyClient::new(proxy_url(addr));

    let error = client.complete("Phi-3", "KEY", "Hello").await.unwrap_err();
    assert!(matches!(error, BackendError::Decode(_)));
}

#[tokio::test]
async fn unreachable_proxy_is_a_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let client = ProxyClient::new(proxy_url(addr));

    let error = client.complete("Phi-3", "KEY", "Hello").await.unwrap_err();
    assert!(matches!(error, BackendError::Http(_)));
    assert_eq!(error.user_message(), "Could not connect to the local proxy.");
}

// ============================================================================
// Binding
// ============================================================================

#[tokio::test]
async fn bind_reports_an_address_in_use() {
    let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let settings = ServerSettings {
        bind: taken.local_addr().unwrap(),
        allowed_origins: Vec::new(),
    };

    let result = server::bind(&settings).await;
    assert!(matches!(result, Err(ServerError::Bind { addr, .. }) if addr == settings.bind));
}
