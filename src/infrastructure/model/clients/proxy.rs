//! Client for the local proxy endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::infrastructure::model::traits::CompletionBackend;
use crate::infrastructure::model::types::BackendError;

/// Posts `{model, apikey, prompt}` to the proxy and returns the JSON body of
/// a successful answer.
#[derive(Clone)]
pub struct ProxyClient {
    url: String,
    http: Client,
}

#[derive(Serialize)]
struct ProxyRequest<'a> {
    model: &'a str,
    apikey: &'a str,
    prompt: &'a str,
}

impl ProxyClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl CompletionBackend for ProxyClient {
    async fn complete(
        &self,
        model: &str,
        apikey: &str,
        prompt: &str,
    ) -> Result<Value, BackendError> {
        info!(model, url = self.url.as_str(), "Sending prompt to local proxy");

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(apikey)
            .json(&ProxyRequest {
                model,
                apikey,
                prompt,
            })
            .send()
            .await
            .map_err(BackendError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(BackendError::Http)?;
        debug!(model, bytes = body.len(), "Proxy answered");
        Ok(serde_json::from_slice(&body)?)
    }
}
