//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Identity reported by synthesized user payloads when `main_user` is unset.
pub const DEFAULT_MAIN_USER: &str = "polaris";

/// Root configuration for the console gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Console-facing settings: endpoint group prefixes and fallback identity.
    pub web_server: WebServerConfig,

    /// The control-plane server most routes forward to.
    pub polaris_server: UpstreamConfig,

    /// The metrics server queried by the console's monitoring pages.
    pub monitor_server: UpstreamConfig,

    /// Headers stripped from every forwarded request.
    pub sanitize: SanitizeConfig,

    /// Upstream transport timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            web_server: WebServerConfig::default(),
            polaris_server: UpstreamConfig::new("127.0.0.1:8090"),
            monitor_server: UpstreamConfig::new("127.0.0.1:9090"),
            sanitize: SanitizeConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Console-facing configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WebServerConfig {
    /// Owner reported when the control plane cannot answer the main-user
    /// lookup. Empty means [`DEFAULT_MAIN_USER`].
    pub main_user: String,

    pub naming_v1_url: String,
    pub auth_url: String,
    pub core_url: String,
    pub config_url: String,
    pub monitor_url: String,
    pub maintain_url: String,
}

impl WebServerConfig {
    /// The configured owner, verbatim, or the built-in default when none is set.
    pub fn owner(&self) -> &str {
        if self.main_user.is_empty() {
            DEFAULT_MAIN_USER
        } else {
            &self.main_user
        }
    }

    /// All endpoint group prefixes with their config key, for validation.
    pub fn prefixes(&self) -> [(&'static str, &str); 6] {
        [
            ("web_server.naming_v1_url", &self.naming_v1_url),
            ("web_server.auth_url", &self.auth_url),
            ("web_server.core_url", &self.core_url),
            ("web_server.config_url", &self.config_url),
            ("web_server.monitor_url", &self.monitor_url),
            ("web_server.maintain_url", &self.maintain_url),
        ]
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            main_user: String::new(),
            naming_v1_url: "/naming/v1".to_string(),
            auth_url: "/auth/v1".to_string(),
            core_url: "/core/v1".to_string(),
            config_url: "/config/v1".to_string(),
            monitor_url: "/api/v1".to_string(),
            maintain_url: "/maintain/v1".to_string(),
        }
    }
}

/// A single plain-HTTP upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Host authority to dial (e.g., "127.0.0.1:8090").
    pub address: String,
}

impl UpstreamConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }
}

/// Request sanitization configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Header names removed before forwarding (case-insensitive).
    pub headers: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            headers: vec!["cookie".to_string()],
        }
    }
}

/// Upstream transport timeouts.
///
/// There is no overall request timeout; a slow upstream holds the request
/// for as long as the transport allows.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds. Unset keeps the
    /// transport default (no limit).
    pub connect_secs: Option<u64>,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: None,
            idle_secs: 90,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9091".to_string(),
        }
    }
}
