//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build pipelines and the route table
//! - Start the metrics exporter when enabled
//! - Bind the listener
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener is bound last, so no connection is accepted before the
//!   gateway can serve it

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::join;
use crate::config::validation::{validate_config, ValidationError};
use crate::config::GatewayConfig;
use crate::http::HttpServer;
use crate::observability::metrics;
use crate::pipeline::TargetError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join(.0))]
    Config(Vec<ValidationError>),

    #[error("invalid upstream: {0}")]
    Target(#[from] TargetError),

    #[error("invalid address {0:?}")]
    Address(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// A gateway ready to serve.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
}

/// Bring the gateway up to the point of accepting connections.
pub async fn start(config: GatewayConfig) -> Result<Started, StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    let bind_addr = parse_addr(&config.listener.bind_address)?;
    let metrics_addr = if config.observability.metrics_enabled {
        Some(parse_addr(&config.observability.metrics_address)?)
    } else {
        None
    };

    let server = HttpServer::new(config)?;

    if let Some(addr) = metrics_addr {
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: bind_addr,
            source,
        })?;

    Ok(Started { server, listener })
}

fn parse_addr(value: &str) -> Result<SocketAddr, StartupError> {
    value
        .parse()
        .map_err(|_| StartupError::Address(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_never_binds() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();
        config.polaris_server.address = String::new();

        let err = start(config).await.err().unwrap();
        assert!(matches!(err, StartupError::Config(ref e) if e.len() == 1));
    }

    #[tokio::test]
    async fn test_binds_ephemeral_port() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "127.0.0.1:0".into();

        let started = start(config).await.unwrap();
        assert_ne!(started.listener.local_addr().unwrap().port(), 0);
    }
}
