//! Address-based request/reply bus.
//!
//! # Responsibilities
//! - Register one consumer per address
//! - Deliver request messages with a one-shot reply port
//! - Await the reply on behalf of the sender
//!
//! # Design Decisions
//! - Bounded queue per address; senders wait when a consumer falls behind
//! - A closed consumer frees its address for re-registration
//! - Registry is a concurrent map, no global lock on the send path

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::bus::Message;

/// Errors returned by bus operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    /// Nobody consumes the address.
    #[error("no consumer registered at address '{0}'")]
    NoConsumer(String),

    /// A live consumer already owns the address.
    #[error("address '{0}' already has a consumer")]
    AddressInUse(String),

    /// The consumer went away before the message was delivered.
    #[error("consumer at address '{0}' is closed")]
    Closed(String),

    /// The message was dropped without a reply.
    #[error("no reply received from address '{0}'")]
    NoReply(String),
}

/// Handle to the bus. Cheap to clone; all clones share the registry.
#[derive(Debug, Clone)]
pub struct EventBus {
    capacity: usize,
    addresses: Arc<DashMap<String, mpsc::Sender<Message>>>,
}

impl EventBus {
    /// Create a bus whose address queues hold `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            addresses: Arc::new(DashMap::new()),
        }
    }

    /// Register the consumer for `address`.
    pub fn consumer(&self, address: &str) -> Result<Consumer, BusError> {
        let (tx, rx) = mpsc::channel(self.capacity);
        match self.addresses.entry(address.to_string()) {
            Entry::Occupied(entry) if !entry.get().is_closed() => {
                return Err(BusError::AddressInUse(address.to_string()));
            }
            Entry::Occupied(mut entry) => {
                entry.insert(tx);
            }
            Entry::Vacant(entry) => {
                entry.insert(tx);
            }
        }

        tracing::debug!(address = %address, "Consumer registered");
        Ok(Consumer {
            address: address.to_string(),
            rx,
        })
    }

    /// Send `body` to `address` and wait for the reply.
    pub async fn request(&self, address: &str, body: Value) -> Result<Value, BusError> {
        let sender = self
            .addresses
            .get(address)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BusError::NoConsumer(address.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        let reply_address = format!("__reply.{}", Uuid::new_v4());
        let message = Message::new(reply_address, body, reply_tx);

        sender
            .send(message)
            .await
            .map_err(|_| BusError::Closed(address.to_string()))?;

        reply_rx
            .await
            .map_err(|_| BusError::NoReply(address.to_string()))
    }

    /// Returns true if a live consumer owns `address`.
    pub fn has_consumer(&self, address: &str) -> bool {
        self.addresses
            .get(address)
            .map(|entry| !entry.value().is_closed())
            .unwrap_or(false)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

/// Receiving side of an address.
#[derive(Debug)]
pub struct Consumer {
    address: String,
    rx: mpsc::Receiver<Message>,
}

impl Consumer {
    /// Next message, or `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Stop accepting new messages. Already queued ones can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}
