use super::docs::ApiDoc;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use crate::config::ServerSettings;
use crate::constants::PROXY_ROUTE;
use crate::model::{Dispatcher, Transport};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;

/// Build the proxy application. An empty origin list allows any origin.
pub fn app<T>(dispatcher: Arc<Dispatcher<T>>, allowed_origins: &[String]) -> Router
where
    T: Transport + 'static,
{
    let api = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(allowed_origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let state = Arc::new(ServerState::new(dispatcher));
    Router::new()
        .route(PROXY_ROUTE, post(routes::response::response_handler::<T>))
        .route("/api/models", get(routes::models::models_handler))
        .route(
            "/api-doc/openapi.json",
            get(move || {
                let api = api.clone();
                async move { Json(api) }
            }),
        )
        .layer(cors)
        .with_state(state)
}

pub(super) async fn bind(settings: &ServerSettings) -> Result<TcpListener, ServerError> {
    let addr = settings.bind;
    info!(%addr, "Binding proxy server");
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })
}

pub(super) async fn serve_on<T>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher<T>>,
    allowed_origins: &[String],
) -> Result<(), ServerError>
where
    T: Transport + 'static,
{
    let app = app(dispatcher, allowed_origins);
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, route = PROXY_ROUTE, "Proxy server ready to accept connections");
    }

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(origin = origin.as_str(), %error, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed)
    }
}
