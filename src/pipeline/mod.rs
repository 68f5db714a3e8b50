//! Forwarding pipeline subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → sanitize.rs (drop session and hop-by-hop headers)
//!     → target.rs (point at the upstream: scheme, authority, Host)
//!     → compose.rs (forward through the shared client)
//!         ├─ response  → intercept.rs (first matching rule rewrites, else pass through)
//!         └─ no response → fallback.rs (configured payload, else 502)
//!     → complete response to the caller
//! ```
//!
//! # Design Decisions
//! - A pipeline is built once at startup and shared read-only via `Arc`
//! - Steps run in a fixed order, once per request, with no retries
//! - Rewritten responses are built fresh; nothing of the upstream body leaks
//! - Caller disconnects are not propagated; the upstream call finishes and
//!   its result is dropped

pub mod compose;
pub mod fallback;
pub mod intercept;
pub mod presets;
pub mod rule;
pub mod sanitize;
pub mod target;

pub use compose::{
    upstream_client, Forwarded, Outcome, Pipeline, PipelineConfig, PipelineError, UpstreamClient,
};
pub use presets::{PipelineKind, Pipelines};
pub use rule::{InterceptionRule, Replacement, StatusTrigger};
pub use sanitize::Sanitizer;
pub use target::{ForwardingTarget, TargetError};
