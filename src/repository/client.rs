//! Upstream HTTP client construction.

use std::time::Duration;

use bytes::Bytes;
use http_body_util::Empty;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::{TokioExecutor, TokioTimer},
};

use crate::config::ClientOptions;

/// Pooled client used for every repository call. Cheap to clone.
pub type RepositoryClient = Client<HttpConnector, Empty<Bytes>>;

/// Build the client. Options left unset keep the hyper defaults.
pub fn build_client(options: &ClientOptions) -> RepositoryClient {
    let mut connector = HttpConnector::new();
    if let Some(ms) = options.connect_timeout_ms {
        connector.set_connect_timeout(Some(Duration::from_millis(ms)));
    }
    if let Some(nodelay) = options.nodelay {
        connector.set_nodelay(nodelay);
    }

    let mut builder = Client::builder(TokioExecutor::new());
    builder.pool_timer(TokioTimer::new());
    if let Some(secs) = options.pool_idle_timeout_secs {
        builder.pool_idle_timeout(Duration::from_secs(secs));
    }
    if let Some(max) = options.pool_max_idle_per_host {
        builder.pool_max_idle_per_host(max);
    }
    if options.http2_only {
        builder.http2_only(true);
    }

    builder.build(connector)
}
