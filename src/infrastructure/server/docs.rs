use super::dto::{ModelDescriptor, ModelListResponse, ProxyRequest};
use super::routes;
use crate::model::AuthScheme;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::response::response_handler,
        routes::models::models_handler
    ),
    components(
        schemas(
            ProxyRequest,
            ModelDescriptor,
            ModelListResponse,
            AuthScheme
        )
    ),
    tags(
        (name = "proxy", description = "Forward one prompt to one upstream LLM provider")
    )
)]
pub(super) struct ApiDoc;
