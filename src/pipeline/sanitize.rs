//! Request header sanitization.
//!
//! # Responsibilities
//! - Remove configured headers (session cookies) before forwarding
//! - Strip hop-by-hop headers, including those named by `Connection`
//!
//! # Design Decisions
//! - Only the header map is touched; method, URI and body never are
//! - Removing an absent header is a no-op, so sanitization cannot fail

use axum::http::{header, HeaderMap, HeaderName};

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Header names stripped from every request a pipeline forwards.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    remove: Vec<HeaderName>,
}

impl Sanitizer {
    pub fn new(names: impl IntoIterator<Item = HeaderName>) -> Self {
        let mut remove: Vec<HeaderName> = Vec::new();
        for name in names {
            if !remove.contains(&name) {
                remove.push(name);
            }
        }
        Self { remove }
    }

    /// Build from configured names. Invalid names are skipped; validation
    /// rejects them before this is reached.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self::new(
            names
                .iter()
                .filter_map(|n| HeaderName::from_bytes(n.as_ref().trim().as_bytes()).ok()),
        )
    }

    /// The configured names, excluding the fixed hop-by-hop set.
    pub fn headers(&self) -> &[HeaderName] {
        &self.remove
    }

    pub fn sanitize(&self, headers: &mut HeaderMap) {
        let listed: Vec<String> = headers
            .get_all(header::CONNECTION)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .map(|token| token.trim().to_ascii_lowercase())
            .filter(|token| !token.is_empty())
            .collect();
        for name in &listed {
            headers.remove(name.as_str());
        }

        for name in HOP_BY_HOP {
            headers.remove(*name);
        }

        for name in &self.remove {
            headers.remove(name);
        }
    }
}
