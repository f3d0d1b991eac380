//! Model traits

use super::types::{BackendError, DispatchError, UpstreamRequest, UpstreamResponse};
use async_trait::async_trait;
use serde_json::Value;

/// Sends one materialized request upstream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue exactly one outbound call. Non-success statuses are returned, not raised.
    async fn send(
        &self,
        model: &str,
        request: UpstreamRequest,
    ) -> Result<UpstreamResponse, DispatchError>;
}

/// Produces the raw JSON completion for one model, either through the local
/// proxy or in-process.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, model: &str, apikey: &str, prompt: &str)
    -> Result<Value, BackendError>;
}

#[async_trait]
impl<B: CompletionBackend + ?Sized> CompletionBackend for std::sync::Arc<B> {
    async fn complete(&self, model: &str, apikey: &str, prompt: &str)
    -> Result<Value, BackendError> {
        (**self).complete(model, apikey, prompt).await
    }
}
