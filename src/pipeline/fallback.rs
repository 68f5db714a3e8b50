//! Error-path synthesis for transport failures.
//!
//! Used when no upstream response exists at all (connection refused, DNS
//! failure, reset before headers). The upstream is never retried here.

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};

use crate::pipeline::rule::Replacement;

/// Response for a failed round trip: the configured fallback, or a plain 502.
pub fn synthesize(fallback: Option<&Replacement>) -> Response<Body> {
    match fallback {
        Some(replacement) => replacement.to_response(),
        None => (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response(),
    }
}
