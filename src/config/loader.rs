//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

pub(crate) fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    let config: GatewayConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogFormat;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.polaris_server.address, "127.0.0.1:8090");
        assert_eq!(config.monitor_server.address, "127.0.0.1:9090");
        assert_eq!(config.sanitize.headers, vec!["cookie".to_string()]);
        assert_eq!(config.web_server.owner(), "polaris");
    }

    #[test]
    fn test_parses_full_document() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:18080"

            [web_server]
            main_user = "bob"
            maintain_url = "/maintain/v2"

            [polaris_server]
            address = "polaris.internal:8090"

            [sanitize]
            headers = ["cookie", "x-session"]

            [timeouts]
            connect_secs = 3

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:18080");
        assert_eq!(config.web_server.owner(), "bob");
        assert_eq!(config.web_server.maintain_url, "/maintain/v2");
        assert_eq!(config.web_server.auth_url, "/auth/v1");
        assert_eq!(config.polaris_server.address, "polaris.internal:8090");
        assert_eq!(config.monitor_server.address, "127.0.0.1:9090");
        assert_eq!(config.sanitize.headers.len(), 2);
        assert_eq!(config.timeouts.connect_secs, Some(3));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_invalid_upstream() {
        let err = parse_config(
            r#"
            [polaris_server]
            address = "http://polaris:8090/"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        assert!(err.to_string().contains("polaris_server.address"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(matches!(
            parse_config("[listener"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/console-gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_main_user_kept_verbatim() {
        let config = parse_config("[web_server]\nmain_user = \" bob \"\n").unwrap();
        assert_eq!(config.web_server.owner(), " bob ");

        let config = parse_config("[web_server]\nmain_user = \"\"\n").unwrap();
        assert_eq!(config.web_server.owner(), "polaris");
    }
}
