//! Interception rules and replacement payloads.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Response, StatusCode},
};

/// Upstream headers that describe the original body and must not survive a
/// body replacement.
const BODY_FRAMING: [HeaderName; 3] = [
    header::CONTENT_LENGTH,
    header::TRANSFER_ENCODING,
    header::CONTENT_ENCODING,
];

/// Decides from the upstream status whether a rule fires.
#[derive(Debug, Clone, Copy)]
pub enum StatusTrigger {
    Is(StatusCode),
    IsNot(StatusCode),
    Matches(fn(StatusCode) -> bool),
}

impl StatusTrigger {
    pub fn fires(&self, status: StatusCode) -> bool {
        match self {
            StatusTrigger::Is(expected) => status == *expected,
            StatusTrigger::IsNot(expected) => status != *expected,
            StatusTrigger::Matches(predicate) => predicate(status),
        }
    }
}

/// A complete synthesized response: status, headers and body.
#[derive(Debug, Clone)]
pub struct Replacement {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Replacement {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A replacement carrying `content-type: application/json`.
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, body).with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Build a fresh response from this payload alone.
    pub fn to_response(&self) -> Response<Body> {
        self.merge_into(HeaderMap::new())
    }

    /// Build a response from this payload on top of `upstream` headers.
    ///
    /// Body-framing headers of the upstream are dropped, same-named headers
    /// are replaced, and `content-length` always equals the body length.
    pub fn merge_into(&self, mut upstream: HeaderMap) -> Response<Body> {
        for name in &BODY_FRAMING {
            upstream.remove(name);
        }
        for name in self.headers.keys() {
            upstream.remove(name);
        }
        for (name, value) in &self.headers {
            upstream.append(name.clone(), value.clone());
        }
        upstream.insert(header::CONTENT_LENGTH, HeaderValue::from(self.body.len()));

        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = upstream;
        response
    }
}

/// A trigger paired with the payload that replaces a matching response.
#[derive(Debug, Clone)]
pub struct InterceptionRule {
    name: String,
    trigger: StatusTrigger,
    replacement: Replacement,
}

impl InterceptionRule {
    pub fn new(name: impl Into<String>, trigger: StatusTrigger, replacement: Replacement) -> Self {
        Self {
            name: name.into(),
            trigger,
            replacement,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> StatusTrigger {
        self.trigger
    }

    pub fn replacement(&self) -> &Replacement {
        &self.replacement
    }
}
