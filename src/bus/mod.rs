//! In-process event bus.
//!
//! # Data Flow
//! ```text
//! EventBus::request(address, body)
//!     → address queue (bounded mpsc)
//!     → Consumer::recv() → Message
//!     → Message::reply(value) (oneshot)
//!     → request() resolves with value
//! ```
//!
//! # Design Decisions
//! - Payloads are JSON values; consumers decode their own schema
//! - Exactly one reply port per message, consumed on reply
//! - Reply addresses are generated per request for tracing

pub mod event_bus;
pub mod message;

pub use event_bus::{BusError, Consumer, EventBus};
pub use message::Message;
