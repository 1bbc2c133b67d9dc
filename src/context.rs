//! Process-wide shared state, built once at startup.

use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::repository::client::{build_client, RepositoryClient};
use crate::security::AllowedHeaders;

/// Read-only state handed to the connector and the bridge.
#[derive(Clone)]
pub struct BridgeContext {
    config: Arc<BridgeConfig>,
    client: RepositoryClient,
    allowed_headers: Arc<AllowedHeaders>,
}

impl BridgeContext {
    /// Compile the allow-list and build the shared HTTP client.
    pub fn new(config: BridgeConfig) -> Result<Self, regex::Error> {
        let allowed_headers = AllowedHeaders::new(&config.allowed_request_headers)?;
        let client = build_client(&config.client_options);
        Ok(Self {
            config: Arc::new(config),
            client,
            allowed_headers: Arc::new(allowed_headers),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn client(&self) -> &RepositoryClient {
        &self.client
    }

    pub fn allowed_headers(&self) -> &Arc<AllowedHeaders> {
        &self.allowed_headers
    }
}
