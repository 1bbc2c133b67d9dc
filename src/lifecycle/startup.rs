//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the shared context (allow-list, HTTP client)
//! - Register the bridge on its bus address
//! - Start the bridge loop and the ingress server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The bridge is registered before the ingress accepts traffic

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::bridge::ServiceBridge;
use crate::bus::{BusError, EventBus};
use crate::config::BridgeConfig;
use crate::context::BridgeContext;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::repository::HttpRepositoryConnector;

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid allowed header pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("bridge registration failed: {0}")]
    Bus(#[from] BusError),

    #[error("failed to bind ingress: {0}")]
    Bind(#[from] std::io::Error),
}

/// Handles to a started bridge.
pub struct Running {
    bus: EventBus,
    ingress_addr: Option<SocketAddr>,
    tasks: Vec<JoinHandle<()>>,
}

impl Running {
    /// The bus the bridge consumes from.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Bound ingress address, if the ingress is enabled.
    pub fn ingress_addr(&self) -> Option<SocketAddr> {
        self.ingress_addr
    }

    /// Wait for the bridge and ingress tasks to finish.
    pub async fn join(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                tracing::error!(error = %e, "Background task failed");
            }
        }
    }
}

/// Start the bridge (and ingress) described by `config`.
pub async fn start(config: BridgeConfig, shutdown: &Shutdown) -> Result<Running, StartupError> {
    let context = BridgeContext::new(config)?;
    let config = context.config();

    if context.allowed_headers().is_empty() {
        tracing::info!("No allowed request headers configured, all request headers are dropped");
    }

    let bus = EventBus::new(config.bus.capacity);
    let connector = HttpRepositoryConnector::new(&context);
    let bridge = ServiceBridge::bind(&bus, &config.address, connector)?;

    tracing::info!(
        address = %config.address,
        domain = %config.client_destination.domain,
        port = config.client_destination.port,
        allowed_headers = context.allowed_headers().len(),
        "Repository bridge registered"
    );

    let mut tasks = vec![tokio::spawn(bridge.run(shutdown.subscribe()))];

    let mut ingress_addr = None;
    if config.ingress.enabled {
        let listener = TcpListener::bind(&config.ingress.bind_address).await?;
        ingress_addr = Some(listener.local_addr()?);

        let server = HttpServer::new(bus.clone(), &config.ingress);
        let server_shutdown = shutdown.subscribe();
        tasks.push(tokio::spawn(async move {
            if let Err(e) = server.run(listener, server_shutdown).await {
                tracing::error!(error = %e, "Ingress server failed");
            }
        }));
    }

    Ok(Running {
        bus,
        ingress_addr,
        tasks,
    })
}
