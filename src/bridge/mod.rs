//! Service bridge subsystem.
//!
//! # Data Flow
//! ```text
//! bus Message (JSON ClientRequest)
//!     → service.rs (decode, one task per message)
//!     → RepositoryConnector::process
//!     → Message::reply(JSON ClientResponse)
//! ```
//!
//! # Design Decisions
//! - Exactly one reply per message, whichever stage fails
//! - Decode failures and connector panics reply with the internal error response
//! - No per-request state; replies may leave out of arrival order

pub mod service;

pub use service::ServiceBridge;
