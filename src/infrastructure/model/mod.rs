//! Model infrastructure module
//!
//! Turns a logical model name into an upstream HTTP call and turns whatever
//! comes back into plain text.
//!
//! # Structure
//! - `types` - Upstream request/response envelopes and error types
//! - `traits` - Transport, CompletionBackend traits
//! - `catalog` - Static table of supported models
//! - `adapter` - Message format adapters
//! - `dispatcher` - Validates input and sends the upstream request
//! - `normalize` - Extracts answer text from provider JSON
//! - `clients` - reqwest transport and local proxy client

pub mod adapter;
pub mod catalog;
pub mod clients;
pub mod dispatcher;
pub mod normalize;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use catalog::{AuthScheme, MODEL_CATALOG, ModelSpec};
pub use clients::{HttpClientBase, ProxyClient};
pub use dispatcher::{Dispatcher, GenerationRequest};
pub use normalize::{extract_text, normalize};
pub use traits::{CompletionBackend, Transport};
pub use types::{BackendError, DispatchError, UpstreamRequest, UpstreamResponse};
