//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    Json, Router,
};
use console_gateway::config::{GatewayConfig, UpstreamConfig};
use console_gateway::lifecycle::{self, Shutdown};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `app` on an ephemeral local port.
async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Start a mock backend that answers every request with a fixed response.
///
/// Responses carry `content-type: text/plain` and `x-upstream: mock` so
/// tests can see which upstream headers survive a rewrite.
#[allow(dead_code)]
pub async fn start_mock_backend(status: u16, body: &'static str) -> SocketAddr {
    let status = StatusCode::from_u16(status).unwrap();
    let app = Router::new().fallback(move || async move {
        (
            status,
            [
                (header::CONTENT_TYPE, "text/plain"),
                (header::HeaderName::from_static("x-upstream"), "mock"),
            ],
            body,
        )
    });
    serve(app).await
}

/// Start a mock backend that echoes the request it received as JSON:
/// `{"method", "path", "query", "headers": {name: value}, "body"}`.
#[allow(dead_code)]
pub async fn start_echo_backend() -> SocketAddr {
    let app = Router::new().fallback(
        |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| async move {
            let headers: BTreeMap<String, String> = headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
                .collect();
            Json(serde_json::json!({
                "method": method.as_str(),
                "path": uri.path(),
                "query": uri.query(),
                "headers": headers,
                "body": String::from_utf8_lossy(&body),
            }))
        },
    );
    serve(app).await
}

/// Start a raw TCP backend that reads the request head, writes `response`
/// and then holds the connection open without sending anything more.
#[allow(dead_code)]
pub async fn start_stalling_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = socket.write_all(response.as_bytes()).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
            });
        }
    });
    addr
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing both upstreams at the given addresses, listening on an
/// ephemeral port.
#[allow(dead_code)]
pub fn gateway_config(polaris: SocketAddr, monitor: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.polaris_server = UpstreamConfig::new(polaris.to_string());
    config.monitor_server = UpstreamConfig::new(monitor.to_string());
    config
}

/// A running gateway. Dropping it shuts the server down.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the gateway with `config` and return once it accepts connections.
pub async fn start_gateway(config: GatewayConfig) -> TestGateway {
    let started = lifecycle::start(config).await.unwrap();
    let addr = started.listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(started.server.run(started.listener, rx));
    TestGateway { addr, shutdown }
}

/// Parse a response body as JSON.
#[allow(dead_code)]
pub async fn json_body(response: reqwest::Response) -> Value {
    let text = response.text().await.unwrap();
    serde_json::from_str(&text).unwrap()
}
