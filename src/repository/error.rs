//! Connector failure taxonomy.
//!
//! These errors never leave the connector: every variant is logged and
//! turned into [`ClientResponse::internal_error`](crate::http::ClientResponse::internal_error).

use axum::http;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The assembled request target is not a valid URI.
    #[error("invalid repository uri '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: http::uri::InvalidUri,
    },

    /// The outbound request could not be assembled.
    #[error("failed to build repository request: {0}")]
    Request(#[from] http::Error),

    /// Connection refused, DNS failure, protocol error.
    #[error("repository request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// The response body stream ended abnormally.
    #[error("repository response body failed: {0}")]
    Body(#[from] hyper::Error),
}

impl ConnectorError {
    /// Short label used for metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            ConnectorError::InvalidUri { .. } | ConnectorError::Request(_) => "request",
            ConnectorError::Transport(_) => "transport",
            ConnectorError::Body(_) => "body",
        }
    }
}
