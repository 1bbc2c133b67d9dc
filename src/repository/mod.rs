//! Repository connector subsystem.
//!
//! # Data Flow
//! ```text
//! ClientRequest
//!     → security::AllowedHeaders (filter headers)
//!     → uri.rs (path + encoded query)
//!     → client.rs (GET http://domain:port/uri)
//!     → body.rs (aggregate streamed body)
//!     → ClientResponse (success or internal error)
//! ```
//!
//! # Design Decisions
//! - `process` is infallible: failures resolve to the internal error response
//! - Client and allow-list are shared read-only across requests

use std::future::Future;

use crate::http::{ClientRequest, ClientResponse};

pub mod body;
pub mod client;
pub mod connector;
pub mod error;
pub mod uri;

pub use connector::HttpRepositoryConnector;
pub use error::ConnectorError;

/// Turns a client request into a client response.
pub trait RepositoryConnector: Send + Sync + 'static {
    /// Always resolves to a response; failures become
    /// [`ClientResponse::internal_error`].
    fn process(&self, request: ClientRequest) -> impl Future<Output = ClientResponse> + Send;
}
