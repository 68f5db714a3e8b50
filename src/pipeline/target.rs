//! Upstream target resolution.
//!
//! # Responsibilities
//! - Parse a configured upstream address into a plain-HTTP target
//! - Point an outgoing request at that target (scheme, authority, Host)
//!
//! # Design Decisions
//! - Resolution is pure: no DNS lookups, no I/O; dialing is the client's job
//! - Invalid addresses are rejected when the pipeline is built, never per request
//! - Path and query of the inbound request are kept verbatim

use std::fmt;
use std::str::FromStr;

use axum::http::{
    header,
    request::Parts,
    uri::{Authority, PathAndQuery, Scheme},
    HeaderValue, Uri, Version,
};
use thiserror::Error;

/// Error building a [`ForwardingTarget`] from configuration.
#[derive(Debug, Error)]
pub enum TargetError {
    #[error("upstream address is empty")]
    Empty,

    #[error("invalid upstream address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

/// Where a pipeline sends its requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardingTarget {
    scheme: Scheme,
    authority: Authority,
    host: HeaderValue,
}

impl ForwardingTarget {
    /// Build a plain-HTTP target from a host authority such as `127.0.0.1:8090`.
    pub fn http(address: &str) -> Result<Self, TargetError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(TargetError::Empty);
        }

        let invalid = |reason: String| TargetError::InvalidAddress {
            address: address.to_string(),
            reason,
        };
        let authority = Authority::from_str(address).map_err(|e| invalid(e.to_string()))?;
        if authority.host().is_empty() {
            return Err(invalid("missing host".to_string()));
        }
        let host = HeaderValue::from_str(authority.as_str()).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            host,
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// The upstream URI for an inbound URI: same path and query, this target's
    /// scheme and authority.
    pub fn uri_for(&self, original: &Uri) -> Uri {
        let path_and_query = original
            .path_and_query()
            .cloned()
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()
            .unwrap_or_else(|_| original.clone())
    }

    /// Rewrite request parts so the request goes to this target.
    pub fn resolve(&self, parts: &mut Parts) {
        parts.uri = self.uri_for(&parts.uri);
        parts.headers.insert(header::HOST, self.host.clone());
        parts.version = Version::HTTP_11;
    }
}

impl fmt::Display for ForwardingTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
