//! Pipeline composition: sanitize → resolve → forward → intercept | fallback.

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    response::IntoResponse,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::TimeoutConfig;
use crate::pipeline::fallback::synthesize;
use crate::pipeline::intercept::{intercept, InterceptError};
use crate::pipeline::rule::{InterceptionRule, Replacement};
use crate::pipeline::sanitize::Sanitizer;
use crate::pipeline::target::ForwardingTarget;

/// Plain-HTTP client shared by every pipeline.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the upstream client. Connections are pooled per authority.
pub fn upstream_client(timeouts: &TimeoutConfig) -> UpstreamClient {
    let mut connector = HttpConnector::new();
    connector.set_connect_timeout(timeouts.connect_secs.map(Duration::from_secs));

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
        .build(connector)
}

/// Everything one forwarding unit needs. Immutable once built.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub target: ForwardingTarget,
    pub sanitizer: Sanitizer,
    /// Evaluated in order; the first match wins.
    pub rules: Vec<InterceptionRule>,
    /// Sent when the upstream produced no response at all.
    pub fallback: Option<Replacement>,
}

impl PipelineConfig {
    pub fn new(target: ForwardingTarget) -> Self {
        Self {
            target,
            sanitizer: Sanitizer::default(),
            rules: Vec::new(),
            fallback: None,
        }
    }

    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn with_rule(mut self, rule: InterceptionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_fallback(mut self, fallback: Replacement) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

/// How a request left the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    PassedThrough,
    Rewritten,
    Fallback,
    BadGateway,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::PassedThrough => "passthrough",
            Outcome::Rewritten => "rewritten",
            Outcome::Fallback => "fallback",
            Outcome::BadGateway => "bad_gateway",
        }
    }
}

/// A complete response ready for the caller.
#[derive(Debug)]
pub struct Forwarded {
    pub response: Response<Body>,
    pub outcome: Outcome,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline {pipeline}: {source}")]
    Intercept {
        pipeline: String,
        #[source]
        source: InterceptError,
    },
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

/// One forwarding unit bound to a [`PipelineConfig`].
///
/// Shared read-only across all in-flight requests.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    config: PipelineConfig,
    client: UpstreamClient,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, config: PipelineConfig, client: UpstreamClient) -> Self {
        Self {
            name: name.into(),
            config,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Forward one request. Either a complete response comes back or an
    /// error does; nothing has been written to the caller in the error case.
    pub async fn handle(&self, request: Request<Body>) -> Result<Forwarded, PipelineError> {
        let (mut parts, body) = request.into_parts();
        self.config.sanitizer.sanitize(&mut parts.headers);
        self.config.target.resolve(&mut parts);

        let upstream = Request::from_parts(parts, body);
        let response = match self.client.request(upstream).await {
            Ok(response) => response.map(Body::new),
            Err(e) => {
                tracing::warn!(
                    pipeline = %self.name,
                    target = %self.config.target,
                    connect = e.is_connect(),
                    error = %e,
                    "Upstream request failed"
                );
                let outcome = if self.config.fallback.is_some() {
                    Outcome::Fallback
                } else {
                    Outcome::BadGateway
                };
                return Ok(Forwarded {
                    response: synthesize(self.config.fallback.as_ref()),
                    outcome,
                });
            }
        };

        let upstream_status = response.status();
        let interception =
            intercept(response, &self.config.rules).map_err(|source| PipelineError::Intercept {
                pipeline: self.name.clone(),
                source,
            })?;

        let outcome = match interception.fired {
            Some(rule) => {
                tracing::debug!(
                    pipeline = %self.name,
                    rule = rule.name(),
                    upstream_status = %upstream_status,
                    status = %interception.response.status(),
                    "Rewrote upstream response"
                );
                Outcome::Rewritten
            }
            None => Outcome::PassedThrough,
        };

        Ok(Forwarded {
            response: interception.response,
            outcome,
        })
    }
}
