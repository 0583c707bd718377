//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use crate::config::schema::AddonsConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AddonsConfig, ConfigError> {
    let config: AddonsConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AddonsConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::LogFormat;

    #[test]
    fn parses_full_document() {
        let config = parse_config(
            r#"
            [logging]
            enabled = true
            format = "json"
            report_sink_failures = false

            [observability]
            log_level = "debug"
            metrics_enabled = true
            metrics_address = "127.0.0.1:9100"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.enabled, Some(true));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(!config.logging.report_sink_failures);
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = parse_config("[logging\nenabled = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn semantic_error_is_validation_error() {
        let err = parse_config("[observability]\nlog_level = \"chatty\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().starts_with("Validation failed: "));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
