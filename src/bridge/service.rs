//! Bus consumer that answers every request through a repository connector.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tokio::task::JoinSet;

use crate::bus::{BusError, Consumer, EventBus, Message};
use crate::http::{ClientRequest, ClientResponse};
use crate::observability::metrics;
use crate::repository::RepositoryConnector;

/// Consumes `ClientRequest` messages on one address and replies with a
/// `ClientResponse` for each of them.
pub struct ServiceBridge<C> {
    consumer: Consumer,
    connector: Arc<C>,
}

impl<C: RepositoryConnector> ServiceBridge<C> {
    /// Register on `address`. Requests sent after this returns are queued
    /// until [`run`](Self::run) picks them up.
    pub fn bind(bus: &EventBus, address: &str, connector: C) -> Result<Self, BusError> {
        let consumer = bus.consumer(address)?;
        tracing::debug!(address = %address, "Registered <ServiceBridge>");
        Ok(Self {
            consumer,
            connector: Arc::new(connector),
        })
    }

    /// Process messages until shutdown.
    ///
    /// On shutdown the address stops accepting new messages; queued and
    /// in-flight ones are still answered before this returns.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let mut in_flight = JoinSet::new();
        let mut draining = false;

        loop {
            tokio::select! {
                message = self.consumer.recv() => match message {
                    Some(message) => {
                        in_flight.spawn(handle(self.connector.clone(), message));
                    }
                    None => break,
                },
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                _ = shutdown.recv(), if !draining => {
                    tracing::info!(address = %self.consumer.address(), "Bridge draining");
                    self.consumer.close();
                    draining = true;
                }
            }
        }

        while in_flight.join_next().await.is_some() {}
        tracing::info!(address = %self.consumer.address(), "Bridge stopped");
    }
}

/// Answer one message. Always replies exactly once.
async fn handle<C: RepositoryConnector>(connector: Arc<C>, message: Message) {
    trace_message(&message);

    let response = respond(connector.as_ref(), message.body()).await;
    let status = response.status_code();
    let reply = response.to_json().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to encode reply");
        internal_error_reply()
    });

    metrics::record_reply(status);
    if !message.reply(reply) {
        tracing::debug!("Requester stopped waiting for the reply");
    }
}

async fn respond<C: RepositoryConnector>(connector: &C, body: &Value) -> ClientResponse {
    let request = match ClientRequest::deserialize(body) {
        Ok(request) => request,
        Err(e) => {
            tracing::error!(error = %e, "Error happened: undecodable request");
            metrics::record_internal_error("decode");
            return ClientResponse::internal_error();
        }
    };

    match AssertUnwindSafe(connector.process(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            tracing::error!(panic = %panic_message(&*panic), "Error happened: connector panicked");
            metrics::record_internal_error("panic");
            ClientResponse::internal_error()
        }
    }
}

fn trace_message(message: &Message) {
    if tracing::enabled!(tracing::Level::TRACE) {
        tracing::trace!(
            reply_address = %message.reply_address(),
            body = %message.body(),
            "Got message"
        );
    }
}

fn internal_error_reply() -> Value {
    json!({ "statusCode": 500, "headers": {}, "body": "" })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::time::Duration;

    use crate::http::Headers;
    use crate::lifecycle::Shutdown;

    /// Replies with the request path as body; `/slow` takes longer.
    struct PathConnector;

    impl RepositoryConnector for PathConnector {
        async fn process(&self, request: ClientRequest) -> ClientResponse {
            if request.path() == "/slow" {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            ClientResponse::new(200, Headers::new(), Bytes::from(request.path().to_string()))
        }
    }

    struct PanickingConnector;

    impl RepositoryConnector for PanickingConnector {
        async fn process(&self, _request: ClientRequest) -> ClientResponse {
            panic!("connector bug");
        }
    }

    fn start<C: RepositoryConnector>(connector: C) -> (EventBus, Shutdown) {
        let bus = EventBus::new(16);
        let shutdown = Shutdown::new();
        let bridge = ServiceBridge::bind(&bus, "repo", connector).unwrap();
        tokio::spawn(bridge.run(shutdown.subscribe()));
        (bus, shutdown)
    }

    fn sentinel() -> Value {
        ClientResponse::internal_error().to_json().unwrap()
    }

    #[tokio::test]
    async fn test_replies_with_connector_response() {
        let (bus, _shutdown) = start(PathConnector);
        let reply = bus.request("repo", json!({ "path": "/content/page" })).await.unwrap();
        assert_eq!(reply["statusCode"], 200);
        assert_eq!(reply["body"], "/content/page");
    }

    #[tokio::test]
    async fn test_undecodable_request_gets_internal_error() {
        let (bus, _shutdown) = start(PathConnector);
        let reply = bus.request("repo", json!({ "nopath": true })).await.unwrap();
        assert_eq!(reply, sentinel());
    }

    #[tokio::test]
    async fn test_connector_panic_gets_internal_error() {
        let (bus, _shutdown) = start(PanickingConnector);
        let reply = bus.request("repo", json!({ "path": "/" })).await.unwrap();
        assert_eq!(reply, sentinel());

        // The bridge keeps serving after a panic.
        let reply = bus.request("repo", json!({ "path": "/" })).await.unwrap();
        assert_eq!(reply, sentinel());
    }

    #[tokio::test]
    async fn test_requests_processed_concurrently() {
        let (bus, _shutdown) = start(PathConnector);

        let slow_bus = bus.clone();
        let slow = tokio::spawn(async move { slow_bus.request("repo", json!({ "path": "/slow" })).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fast = bus.request("repo", json!({ "path": "/fast" })).await.unwrap();
        assert_eq!(fast["body"], "/fast");
        assert!(!slow.is_finished(), "fast reply must not wait for the slow one");

        assert_eq!(slow.await.unwrap().unwrap()["body"], "/slow");
    }

    #[tokio::test]
    async fn test_shutdown_still_answers_in_flight() {
        let (bus, shutdown) = start(PathConnector);

        let slow_bus = bus.clone();
        let slow = tokio::spawn(async move { slow_bus.request("repo", json!({ "path": "/slow" })).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();

        assert_eq!(slow.await.unwrap().unwrap()["body"], "/slow");

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(bus.request("repo", json!({ "path": "/" })).await.is_err());
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(panic_message(&*boxed), "static");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(&*boxed), "owned");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(&*boxed), "unknown panic");
    }
}
