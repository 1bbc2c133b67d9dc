//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound ClientRequest headers:
//!     → headers.rs (allow-list filter)
//!     → Forwarded to repository
//! ```
//!
//! # Design Decisions
//! - Fail closed: nothing is forwarded unless explicitly allowed
//! - No trust in client input

pub mod headers;

pub use headers::AllowedHeaders;
