//! HTTP data objects and the bus ingress server.
//!
//! # Data Flow
//! ```text
//! POST /eventbus/{address}
//!     → server.rs (Axum setup, timeout + trace layers)
//!     → bus request to {address}
//!     → reply JSON returned as the HTTP body
//!
//! Bus payloads:
//!     request.rs  (ClientRequest, decoded by the bridge)
//!     response.rs (ClientResponse, encoded into the reply)
//! ```

use std::collections::BTreeMap;

pub mod request;
pub mod response;
pub mod server;

pub use request::{ClientRequest, Params};
pub use response::ClientResponse;
pub use server::HttpServer;

/// Header name to all of its values.
pub type Headers = BTreeMap<String, Vec<String>>;
