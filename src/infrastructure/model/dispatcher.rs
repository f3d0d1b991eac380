//! Dispatcher - routes a logical model name to its upstream call

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::catalog::{self, ModelSpec};
use super::clients::HttpClientBase;
use super::traits::{CompletionBackend, Transport};
use super::types::{BackendError, DispatchError, UpstreamResponse};

/// One dispatch call, borrowed for its duration.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub model: &'static ModelSpec,
    pub apikey: &'a str,
    pub prompt: &'a str,
}

impl<'a> GenerationRequest<'a> {
    /// Validate raw inputs and resolve the model. Field presence is checked
    /// before the model lookup.
    pub fn resolve(model: &str, apikey: &'a str, prompt: &'a str) -> Result<Self, DispatchError> {
        if model.is_empty() || apikey.is_empty() || prompt.is_empty() {
            return Err(DispatchError::MissingFields);
        }
        let spec = catalog::lookup(model).ok_or_else(|| DispatchError::invalid_model(model))?;
        Ok(Self {
            model: spec,
            apikey,
            prompt,
        })
    }
}

/// Maps logical model names to upstream requests and sends them.
pub struct Dispatcher<T: Transport = HttpClientBase> {
    transport: T,
}

impl Dispatcher<HttpClientBase> {
    pub fn http() -> Self {
        Self::new(HttpClientBase::new())
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build and send the upstream request for `model`. The upstream status
    /// is not inspected; error bodies come back like any other.
    pub async fn dispatch(
        &self,
        model: &str,
        apikey: &str,
        prompt: &str,
    ) -> Result<UpstreamResponse, DispatchError> {
        let request = match GenerationRequest::resolve(model, apikey, prompt) {
            Ok(request) => request,
            Err(error) => {
                warn!(model, %error, "Rejecting dispatch before any network call");
                return Err(error);
            }
        };
        let spec = request.model;
        let upstream = spec.build_request(request.prompt, request.apikey);

        info!(
            model = spec.logical_name,
            upstream_model = spec.upstream_model,
            endpoint = spec.endpoint,
            "Dispatching prompt upstream"
        );
        let response = self.transport.send(spec.logical_name, upstream).await?;
        debug!(
            model = spec.logical_name,
            status = response.status,
            "Dispatch finished"
        );
        Ok(response)
    }
}

/// In-process backend: same contract as the proxy endpoint, no HTTP hop.
#[async_trait]
impl<T: Transport> CompletionBackend for Dispatcher<T> {
    async fn complete(
        &self,
        model: &str,
        apikey: &str,
        prompt: &str,
    ) -> Result<Value, BackendError> {
        let response = self.dispatch(model, apikey, prompt).await?;
        Ok(response.json()?)
    }
}
