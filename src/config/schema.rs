//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the bridge.
//! All types derive Serde traits for deserialization from config files.

use std::net::Ipv6Addr;

use serde::{Deserialize, Serialize};

/// Root configuration for the repository bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bus address the bridge consumes requests from.
    pub address: String,

    /// Repository host and port every request is forwarded to.
    pub client_destination: ClientDestination,

    /// HTTP client transport tuning.
    pub client_options: ClientOptions,

    /// Regex patterns of request header names forwarded upstream.
    /// Empty means no request header is forwarded.
    pub allowed_request_headers: Vec<String>,

    /// In-process event bus settings.
    pub bus: BusConfig,

    /// HTTP ingress onto the event bus.
    pub ingress: IngressConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl BridgeConfig {
    /// Default bus address of the repository bridge.
    pub const DEFAULT_ADDRESS: &'static str = "repository.http";
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            address: Self::DEFAULT_ADDRESS.to_string(),
            client_destination: ClientDestination::default(),
            client_options: ClientOptions::default(),
            allowed_request_headers: Vec::new(),
            bus: BusConfig::default(),
            ingress: IngressConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Upstream repository destination.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientDestination {
    /// Host name or IP of the repository.
    pub domain: String,

    /// Repository port.
    pub port: u16,
}

impl ClientDestination {
    /// `host:port` for the outbound URI. IPv6 literals are bracketed.
    pub fn authority(&self) -> String {
        match self.domain.parse::<Ipv6Addr>() {
            Ok(ip) => format!("[{}]:{}", ip, self.port),
            Err(_) => format!("{}:{}", self.domain, self.port),
        }
    }
}

impl Default for ClientDestination {
    fn default() -> Self {
        Self {
            domain: "localhost".to_string(),
            port: 3001,
        }
    }
}

/// HTTP client options. Unset fields keep the transport defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientOptions {
    /// TCP connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_timeout_secs: Option<u64>,

    /// Maximum idle pooled connections per host.
    pub pool_max_idle_per_host: Option<usize>,

    /// Speak HTTP/2 only (prior knowledge).
    pub http2_only: bool,

    /// Set TCP_NODELAY on upstream connections.
    pub nodelay: Option<bool>,
}

/// Event bus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BusConfig {
    /// Queue depth per address (backpressure).
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

/// HTTP ingress configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IngressConfig {
    /// Serve the ingress.
    pub enabled: bool,

    /// Bind address (e.g., "127.0.0.1:8092").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "127.0.0.1:8092".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
