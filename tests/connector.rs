//! Repository connector against live mock upstreams.

use std::net::SocketAddr;

use repo_bridge::{BridgeContext, ClientRequest, HttpRepositoryConnector, RepositoryConnector};

mod common;

fn connector(upstream: SocketAddr, allowed: &[&str]) -> HttpRepositoryConnector {
    let context = BridgeContext::new(common::config_for(upstream, allowed)).unwrap();
    HttpRepositoryConnector::new(&context)
}

#[tokio::test]
async fn test_filters_headers_and_encodes_query() {
    let (upstream, mut captured) =
        common::start_fixed_upstream("200 OK", &[("Content-Type", "text/html")], "<html/>").await;

    let request = ClientRequest::new("/content/page")
        .with_param("query", "a b")
        .with_header("Cookie", "x")
        .with_header("X-Debug", "1");

    let response = connector(upstream, &["^X-.*"]).process(request).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.body()[..], b"<html/>");
    assert_eq!(response.headers()["content-type"], vec!["text/html"]);

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.target, "/content/page?query=a%20b");
    assert_eq!(seen.header("x-debug"), Some("1"));
    assert_eq!(seen.header("cookie"), None);
}

#[tokio::test]
async fn test_empty_allow_list_forwards_no_request_headers() {
    let (upstream, mut captured) = common::start_fixed_upstream("200 OK", &[], "ok").await;

    let request = ClientRequest::new("/p")
        .with_header("Cookie", "session=1")
        .with_header("Authorization", "Bearer t");

    let response = connector(upstream, &[]).process(request).await;
    assert_eq!(response.status_code(), 200);

    let seen = captured.recv().await.unwrap();
    assert!(seen
        .headers
        .iter()
        .all(|(name, _)| name.eq_ignore_ascii_case("host")));
}

#[tokio::test]
async fn test_path_like_param_forwarded_readable() {
    let (upstream, mut captured) = common::start_fixed_upstream("200 OK", &[], "").await;

    let request = ClientRequest::new("/search")
        .with_param("q", "a b/c")
        .with_param("page", "2");
    connector(upstream, &[]).process(request).await;

    let seen = captured.recv().await.unwrap();
    assert_eq!(seen.target, "/search?q=a%20b/c&page=2");
}

#[tokio::test]
async fn test_upstream_404_passed_through() {
    let (upstream, _captured) = common::start_fixed_upstream(
        "404 Not Found",
        &[("Content-Type", "text/plain"), ("X-Repo", "a")],
        "not found",
    )
    .await;

    let response = connector(upstream, &[]).process(ClientRequest::new("/missing")).await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(&response.body()[..], b"not found");
    assert_eq!(response.headers()["x-repo"], vec!["a"]);
    assert!(!response.is_internal_error());
}

#[tokio::test]
async fn test_upstream_500_passed_through() {
    let (upstream, _captured) =
        common::start_fixed_upstream("500 Internal Server Error", &[], "boom").await;

    let response = connector(upstream, &[]).process(ClientRequest::new("/")).await;

    assert_eq!(response.status_code(), 500);
    assert_eq!(&response.body()[..], b"boom");
}

#[tokio::test]
async fn test_chunked_body_aggregated() {
    let (upstream, _captured) = common::start_chunked_upstream(&["ab", "cd", "ef"]).await;

    let response = connector(upstream, &[]).process(ClientRequest::new("/")).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(&response.body()[..], b"abcdef");
}

#[tokio::test]
async fn test_connection_refused_is_internal_error() {
    let upstream = common::closed_port().await;

    let response = connector(upstream, &["X-.*"])
        .process(ClientRequest::new("/").with_header("X-Debug", "1"))
        .await;

    assert!(response.is_internal_error());
    assert_eq!(response.status_code(), 500);
    assert!(response.headers().is_empty());
    assert!(response.body().is_empty());
}

#[tokio::test]
async fn test_truncated_body_is_internal_error() {
    let (upstream, _captured) = common::start_upstream(vec![
        "HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\nshort".to_string(),
    ])
    .await;

    let response = connector(upstream, &[]).process(ClientRequest::new("/")).await;

    assert!(response.is_internal_error());
}
