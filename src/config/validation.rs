//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every upstream address is a usable host authority
//! - Check listener and metrics addresses, URL prefixes, header names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderName;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::pipeline::target::ForwardingTarget;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {value:?} is not a socket address")]
    InvalidSocketAddress { field: &'static str, value: String },

    #[error("{field}: {reason}")]
    InvalidUpstream { field: &'static str, reason: String },

    #[error("{field}: {value:?} must start with '/'")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("sanitize.headers: {0:?} is not a valid header name")]
    InvalidHeaderName(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_address(
        &mut errors,
        "listener.bind_address",
        &config.listener.bind_address,
    );

    for (field, address) in [
        ("polaris_server.address", &config.polaris_server.address),
        ("monitor_server.address", &config.monitor_server.address),
    ] {
        if let Err(e) = ForwardingTarget::http(address) {
            errors.push(ValidationError::InvalidUpstream {
                field,
                reason: e.to_string(),
            });
        }
    }

    for (field, prefix) in config.web_server.prefixes() {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::InvalidPrefix {
                field,
                value: prefix.to_string(),
            });
        }
    }

    for name in &config.sanitize.headers {
        if HeaderName::from_bytes(name.trim().as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeaderName(name.clone()));
        }
    }

    if config.observability.metrics_enabled {
        check_socket_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddress {
            field,
            value: value.to_string(),
        });
    }
}
