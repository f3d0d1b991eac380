use super::super::dto::{ModelDescriptor, ModelListResponse};
use crate::model::MODEL_CATALOG;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/models",
    tag = "proxy",
    responses(
        (status = 200, description = "Logical models the proxy can dispatch", body = ModelListResponse)
    )
)]
pub async fn models_handler() -> Json<ModelListResponse> {
    Json(ModelListResponse {
        models: MODEL_CATALOG.iter().map(ModelDescriptor::from).collect(),
    })
}
