//! Shutdown coordination for the bridge.

use tokio::sync::broadcast;

/// Graceful shutdown signal shared by the bridge loop and the ingress server.
///
/// Each task takes its own receiver from [`subscribe`](Self::subscribe) at
/// startup. On [`trigger`](Self::trigger) the bridge stops taking new
/// messages and drains, and the ingress stops accepting connections.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Receiver for one task. Subscribe before triggering, late receivers
    /// miss the signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Signal every subscribed task. A no-op when nothing is subscribed.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
