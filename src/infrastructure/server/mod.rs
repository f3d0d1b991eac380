mod docs;
mod dto;
mod error;
mod router;
mod routes;
mod state;

pub use dto::{ModelDescriptor, ModelListResponse, ProxyRequest};
pub use error::ServerError;
pub use router::app;

use crate::config::ServerSettings;
use crate::model::{Dispatcher, Transport};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Bind the proxy address without serving yet.
pub async fn bind(settings: &ServerSettings) -> Result<TcpListener, ServerError> {
    router::bind(settings).await
}

/// Serve the proxy on an already bound listener until the server stops.
pub async fn serve_on<T>(
    listener: TcpListener,
    dispatcher: Arc<Dispatcher<T>>,
    allowed_origins: &[String],
) -> Result<(), ServerError>
where
    T: Transport + 'static,
{
    router::serve_on(listener, dispatcher, allowed_origins).await
}

pub async fn serve<T>(dispatcher: Arc<Dispatcher<T>>, settings: &ServerSettings) -> Result<(), ServerError>
where
    T: Transport + 'static,
{
    let listener = bind(settings).await?;
    serve_on(listener, dispatcher, &settings.allowed_origins).await
}
