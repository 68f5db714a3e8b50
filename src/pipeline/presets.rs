//! The console's pipeline instances, built once from configuration.
//!
//! | preset      | target          | rule                        | fallback      |
//! |-------------|-----------------|-----------------------------|---------------|
//! | `server`    | control plane   | none                        | 502           |
//! | `bootstrap` | control plane   | 404 → success               | 502           |
//! | `main_user` | control plane   | not 200 → success + owner   | success+owner |
//! | `monitor`   | metrics server  | none                        | 502           |
//!
//! The `main_user` fallback reports a configured identity even when the
//! control plane is down or answered with a genuine error. The console relies
//! on this to render its login flow; it is kept as-is and hides real
//! failures of that lookup.

use std::sync::Arc;

use axum::http::StatusCode;

use crate::config::GatewayConfig;
use crate::pipeline::compose::{Pipeline, PipelineConfig, UpstreamClient};
use crate::pipeline::rule::{InterceptionRule, Replacement, StatusTrigger};
use crate::pipeline::sanitize::Sanitizer;
use crate::pipeline::target::{ForwardingTarget, TargetError};

/// Body returned in place of a control-plane 404 during bootstrap.
pub const BOOTSTRAP_SUCCESS: &str = r#"{"code": 200000,"info": "success"}"#;

/// `{"code":200000,"info":"success","user":{"name":OWNER}}`
pub fn main_user_body(owner: &str) -> String {
    serde_json::json!({
        "code": 200000,
        "info": "success",
        "user": { "name": owner },
    })
    .to_string()
}

/// Which pipeline a route is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineKind {
    Server,
    Bootstrap,
    MainUser,
    Monitor,
}

impl PipelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineKind::Server => "server",
            PipelineKind::Bootstrap => "bootstrap",
            PipelineKind::MainUser => "main_user",
            PipelineKind::Monitor => "monitor",
        }
    }
}

/// All pipelines the route table can point at.
#[derive(Debug, Clone)]
pub struct Pipelines {
    server: Arc<Pipeline>,
    bootstrap: Arc<Pipeline>,
    main_user: Arc<Pipeline>,
    monitor: Arc<Pipeline>,
}

impl Pipelines {
    pub fn from_config(config: &GatewayConfig, client: UpstreamClient) -> Result<Self, TargetError> {
        let polaris = ForwardingTarget::http(&config.polaris_server.address)?;
        let monitor = ForwardingTarget::http(&config.monitor_server.address)?;
        let sanitizer = Sanitizer::from_names(config.sanitize.headers.as_slice());
        let owner_body = main_user_body(config.web_server.owner());

        let base = |target: &ForwardingTarget| {
            PipelineConfig::new(target.clone()).with_sanitizer(sanitizer.clone())
        };
        let build = |kind: PipelineKind, pipeline: PipelineConfig| {
            Arc::new(Pipeline::new(kind.as_str(), pipeline, client.clone()))
        };

        Ok(Self {
            server: build(PipelineKind::Server, base(&polaris)),
            bootstrap: build(
                PipelineKind::Bootstrap,
                base(&polaris).with_rule(InterceptionRule::new(
                    "not-found-as-success",
                    StatusTrigger::Is(StatusCode::NOT_FOUND),
                    Replacement::json(StatusCode::OK, BOOTSTRAP_SUCCESS),
                )),
            ),
            main_user: build(
                PipelineKind::MainUser,
                base(&polaris)
                    .with_rule(InterceptionRule::new(
                        "not-ok-as-main-user",
                        StatusTrigger::IsNot(StatusCode::OK),
                        Replacement::json(StatusCode::OK, owner_body.clone()),
                    ))
                    .with_fallback(Replacement::json(StatusCode::OK, owner_body)),
            ),
            monitor: build(PipelineKind::Monitor, base(&monitor)),
        })
    }

    pub fn get(&self, kind: PipelineKind) -> Arc<Pipeline> {
        match kind {
            PipelineKind::Server => self.server.clone(),
            PipelineKind::Bootstrap => self.bootstrap.clone(),
            PipelineKind::MainUser => self.main_user.clone(),
            PipelineKind::Monitor => self.monitor.clone(),
        }
    }
}
