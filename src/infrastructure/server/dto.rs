use crate::model::{AuthScheme, ModelSpec};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /api/response`. Every field must be present and non-empty.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProxyRequest {
    pub model: Option<String>,
    pub apikey: Option<String>,
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModelDescriptor {
    pub logical_name: String,
    pub upstream_model: String,
    pub endpoint: String,
    pub auth: AuthScheme,
}

impl From<&ModelSpec> for ModelDescriptor {
    fn from(spec: &ModelSpec) -> Self {
        Self {
            logical_name: spec.logical_name.to_string(),
            upstream_model: spec.upstream_model.to_string(),
            endpoint: spec.endpoint.to_string(),
            auth: spec.auth,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModelListResponse {
    pub models: Vec<ModelDescriptor>,
}
