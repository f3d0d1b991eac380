//! Model clients

mod base;
mod proxy;

pub use base::HttpClientBase;
pub use proxy::ProxyClient;
