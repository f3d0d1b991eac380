//! Base HTTP transport shared by every upstream

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::infrastructure::model::traits::Transport;
use crate::infrastructure::model::types::{DispatchError, UpstreamRequest, UpstreamResponse};

/// reqwest-backed transport. Posts the request as-is and hands back the raw
/// status and body without judging either.
#[derive(Clone, Default)]
pub struct HttpClientBase {
    pub http: Client,
}

impl HttpClientBase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for HttpClientBase {
    async fn send(
        &self,
        model: &str,
        request: UpstreamRequest,
    ) -> Result<UpstreamResponse, DispatchError> {
        let mut builder = self.http.post(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder
            .body(request.body.to_string())
            .send()
            .await
            .map_err(|e| DispatchError::network(model, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DispatchError::network(model, e))?;
        debug!(model, status, bytes = body.len(), "Upstream responded");

        Ok(UpstreamResponse::new(status, body.to_vec()))
    }
}
