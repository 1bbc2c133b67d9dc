//! HTTP repository connector.
//!
//! # Responsibilities
//! - Filter request headers against the allow-list
//! - Build the repository URI from path and params
//! - Issue one GET to the configured destination
//! - Aggregate the streamed body into a ClientResponse
//!
//! # Design Decisions
//! - Upstream 4xx/5xx are passed through, not treated as failures
//! - Every other failure is logged and becomes the internal error response
//! - No retries, no timeout beyond what the client options configure

use std::sync::Arc;
use std::time::Instant;

use axum::http::{HeaderName, HeaderValue, Request, Uri};
use bytes::Bytes;
use http_body_util::Empty;

use crate::config::ClientDestination;
use crate::context::BridgeContext;
use crate::http::response::headers_from_map;
use crate::http::{ClientRequest, ClientResponse, Headers};
use crate::observability::metrics;
use crate::repository::body::aggregate_body;
use crate::repository::client::RepositoryClient;
use crate::repository::error::ConnectorError;
use crate::repository::uri::build_uri;
use crate::repository::RepositoryConnector;
use crate::security::AllowedHeaders;

const ERROR_MESSAGE: &str = "Unable to get template from the repository";

/// Forwards client requests to a fixed HTTP repository.
#[derive(Clone)]
pub struct HttpRepositoryConnector {
    client: RepositoryClient,
    destination: ClientDestination,
    allowed_headers: Arc<AllowedHeaders>,
}

impl HttpRepositoryConnector {
    pub fn new(context: &BridgeContext) -> Self {
        Self {
            client: context.client().clone(),
            destination: context.config().client_destination.clone(),
            allowed_headers: context.allowed_headers().clone(),
        }
    }

    async fn forward(&self, request: &ClientRequest) -> Result<ClientResponse, ConnectorError> {
        let headers = self.allowed_headers.filter(request.headers());
        let uri = build_uri(request.path(), request.params());

        tracing::trace!(
            domain = %self.destination.domain,
            port = self.destination.port,
            uri = %uri,
            headers = ?headers,
            "GET Http Repository"
        );

        let outbound = self.outbound_request(&uri, &headers)?;
        let response = self.client.request(outbound).await?;

        tracing::trace!(status = %response.status(), "Got response from remote repository");

        let (parts, body) = response.into_parts();
        let body = aggregate_body(body).await?;

        Ok(ClientResponse::new(
            parts.status.as_u16(),
            headers_from_map(&parts.headers),
            body,
        ))
    }

    fn outbound_request(
        &self,
        uri: &str,
        headers: &Headers,
    ) -> Result<Request<Empty<Bytes>>, ConnectorError> {
        let target = format!("http://{}{}", self.destination.authority(), uri);
        let target: Uri = target
            .parse()
            .map_err(|source| ConnectorError::InvalidUri {
                uri: target.clone(),
                source,
            })?;

        let mut builder = Request::get(target);
        for (name, values) in headers {
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                tracing::warn!(header = %name, "Skipping header with invalid name");
                continue;
            };
            for value in values {
                match HeaderValue::from_str(value) {
                    Ok(value) => builder = builder.header(header_name.clone(), value),
                    Err(_) => tracing::warn!(header = %name, "Skipping invalid header value"),
                }
            }
        }

        Ok(builder.body(Empty::new())?)
    }
}

impl RepositoryConnector for HttpRepositoryConnector {
    async fn process(&self, request: ClientRequest) -> ClientResponse {
        let start = Instant::now();
        match self.forward(&request).await {
            Ok(response) => {
                metrics::record_upstream(response.status_code(), start);
                response
            }
            Err(e) => {
                tracing::error!(
                    path = %request.path(),
                    error = %e,
                    cause = ?std::error::Error::source(&e),
                    "{}",
                    ERROR_MESSAGE
                );
                metrics::record_internal_error(e.stage());
                ClientResponse::internal_error()
            }
        }
    }
}
