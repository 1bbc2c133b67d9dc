//! Bus message with a single-use reply port.

use serde_json::Value;
use tokio::sync::oneshot;

/// A message delivered to a consumer.
///
/// `reply` consumes the message, so a message can be answered at most once.
#[derive(Debug)]
pub struct Message {
    reply_address: String,
    body: Value,
    reply_tx: oneshot::Sender<Value>,
}

impl Message {
    pub(crate) fn new(reply_address: String, body: Value, reply_tx: oneshot::Sender<Value>) -> Self {
        Self {
            reply_address,
            body,
            reply_tx,
        }
    }

    /// Address identifying the sender's reply port.
    pub fn reply_address(&self) -> &str {
        &self.reply_address
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Send the reply. Returns false if the sender stopped waiting.
    pub fn reply(self, value: Value) -> bool {
        self.reply_tx.send(value).is_ok()
    }
}
