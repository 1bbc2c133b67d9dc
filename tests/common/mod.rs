//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use repo_bridge::BridgeConfig;

/// Request head as received by a mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

#[allow(dead_code)]
impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Start a mock upstream that writes `parts` in order, pausing between them,
/// then closes the connection. Every request head is sent to the receiver.
pub async fn start_upstream(
    parts: Vec<String>,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let tx = tx.clone();
                    let parts = parts.clone();
                    tokio::spawn(async move {
                        if let Some(captured) = read_head(&mut socket).await {
                            let _ = tx.send(captured);
                        }
                        for part in parts {
                            let _ = socket.write_all(part.as_bytes()).await;
                            let _ = socket.flush().await;
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, rx)
}

/// Start a mock upstream returning a fixed response.
#[allow(dead_code)]
pub async fn start_fixed_upstream(
    status_line: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let mut response = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    start_upstream(vec![response]).await
}

/// Start a mock upstream streaming `chunks` with chunked transfer encoding.
#[allow(dead_code)]
pub async fn start_chunked_upstream(
    chunks: &[&str],
) -> (SocketAddr, mpsc::UnboundedReceiver<CapturedRequest>) {
    let mut parts = vec![
        "HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n".to_string(),
    ];
    for chunk in chunks {
        parts.push(format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
    }
    parts.push("0\r\n\r\n".to_string());
    start_upstream(parts).await
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Config pointing at `upstream`, with the ingress on an ephemeral port.
#[allow(dead_code)]
pub fn config_for(upstream: SocketAddr, allowed: &[&str]) -> BridgeConfig {
    let mut config = BridgeConfig::default();
    config.client_destination.domain = upstream.ip().to_string();
    config.client_destination.port = upstream.port();
    config.allowed_request_headers = allowed.iter().map(|s| s.to_string()).collect();
    config.ingress.bind_address = "127.0.0.1:0".to_string();
    config
}

async fn read_head(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&buf).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split(' ');
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();
    let headers = lines
        .take_while(|l| !l.is_empty())
        .filter_map(|l| l.split_once(": "))
        .map(|(n, v)| (n.to_string(), v.to_string()))
        .collect();

    Some(CapturedRequest {
        method,
        target,
        headers,
    })
}
