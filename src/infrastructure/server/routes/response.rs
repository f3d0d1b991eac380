use super::super::dto::ProxyRequest;
use super::super::state::ServerState;
use crate::constants::{INTERNAL_ERROR_BODY, INVALID_MODEL_BODY, MISSING_FIELDS_BODY};
use crate::model::{DispatchError, Transport};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type ProxyReply = Result<Json<Value>, (StatusCode, &'static str)>;

#[utoipa::path(
    post,
    path = "/api/response",
    tag = "proxy",
    request_body = ProxyRequest,
    responses(
        (status = 200, description = "Raw JSON body returned by the upstream provider"),
        (status = 400, description = "Missing fields or unsupported model", body = String, content_type = "text/plain"),
        (status = 500, description = "Malformed request, network failure or non-JSON upstream body", body = String, content_type = "text/plain")
    )
)]
pub async fn response_handler<T: Transport>(
    State(state): State<Arc<ServerState<T>>>,
    body: Bytes,
) -> ProxyReply {
    let payload: ProxyRequest = serde_json::from_slice(&body).map_err(|error| {
        error!(%error, "Request body is not valid JSON");
        internal_error()
    })?;

    let model = payload.model.unwrap_or_default();
    let apikey = payload.apikey.unwrap_or_default();
    let prompt = payload.prompt.unwrap_or_default();
    info!(
        model = model.as_str(),
        prompt_chars = prompt.chars().count(),
        "Received /api/response request"
    );

    let dispatcher = state.dispatcher();
    let upstream = match dispatcher.dispatch(&model, &apikey, &prompt).await {
        Ok(upstream) => upstream,
        Err(DispatchError::MissingFields) => {
            return Err((StatusCode::BAD_REQUEST, MISSING_FIELDS_BODY));
        }
        Err(DispatchError::InvalidModel { .. }) => {
            return Err((StatusCode::BAD_REQUEST, INVALID_MODEL_BODY));
        }
        Err(error) => {
            error!(%error, "Upstream dispatch failed");
            return Err(internal_error());
        }
    };

    if !upstream.is_success() {
        warn!(
            model = model.as_str(),
            status = upstream.status,
            "Upstream returned an error status; passing its body through"
        );
    }

    let data = upstream.json().map_err(|error| {
        error!(%error, model = model.as_str(), "Upstream body is not JSON");
        internal_error()
    })?;
    debug!(model = model.as_str(), "Relaying upstream body");
    Ok(Json(data))
}

fn internal_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY)
}
