//! HTTP ingress onto the event bus.
//!
//! # Responsibilities
//! - Create Axum Router with the bus handler
//! - Wire up middleware (timeout, tracing)
//! - Deliver `POST /eventbus/{address}` bodies to the bus and return the reply
//!
//! # Status Mapping
//! - reply received → 200 with the reply JSON
//! - no consumer / consumer closed → 404
//! - message dropped without reply → 502

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::bus::{BusError, EventBus};
use crate::config::IngressConfig;

/// Application state injected into handlers.
#[derive(Clone)]
struct AppState {
    bus: EventBus,
}

/// Ingress server exposing the bus over HTTP.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(bus: EventBus, config: &IngressConfig) -> Self {
        let router = Self::build_router(config, AppState { bus });
        Self { router }
    }

    /// The configured router, for serving or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    #[allow(deprecated)]
    fn build_router(config: &IngressConfig, state: AppState) -> Router {
        Router::new()
            .route("/eventbus/{address}", post(bus_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Ingress server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("Ingress server stopped");
        Ok(())
    }
}

async fn bus_handler(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    match state.bus.request(&address, body).await {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(e @ (BusError::NoConsumer(_) | BusError::Closed(_))) => {
            tracing::warn!(address = %address, error = %e, "No consumer for ingress message");
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::error!(address = %address, error = %e, "Ingress message got no reply");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}
