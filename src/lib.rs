//! Repository request-forwarding bridge.
//!
//! Consumes `ClientRequest` messages from an event bus address, forwards
//! each one as an HTTP GET to a fixed repository and replies with a
//! `ClientResponse`. Every message gets exactly one reply.
//!
//! ```text
//!   bus request ──▶ bridge ──▶ repository connector ──▶ GET http://domain:port/uri
//!                     │              │
//!   bus reply   ◀─────┘◀─────────────┘ (status, headers, aggregated body)
//! ```

// Core subsystems
pub mod bridge;
pub mod bus;
pub mod config;
pub mod context;
pub mod http;
pub mod repository;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use bridge::ServiceBridge;
pub use bus::EventBus;
pub use config::BridgeConfig;
pub use context::BridgeContext;
pub use http::{ClientRequest, ClientResponse};
pub use lifecycle::Shutdown;
pub use repository::{HttpRepositoryConnector, RepositoryConnector};
