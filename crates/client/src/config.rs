use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the dashboard REST API (e.g. https://admin.example.com/api)
    #[serde(default)]
    pub base_url: String,

    /// Bearer token sent with every request; empty disables the header
    #[serde(default)]
    pub token: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults (optional)
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with ADMIN__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("ADMIN").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on config files.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [api]
            base_url = ""
            token = ""
            timeout_ms = 10000

            [logging]
            level = "info"
            format = "pretty"
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        // Skip validation in tests to allow partial configs
        Ok(cfg)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.api.base_url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "ADMIN__API__BASE_URL environment variable must be set".to_string(),
            ));
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "api.base_url must start with http:// or https://, got '{}'",
                self.api.base_url
            )));
        }

        if self.api.timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "api.timeout_ms cannot be 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Token to send, if one is configured.
    pub fn bearer_token(&self) -> Option<&str> {
        let token = self.token.trim();
        (!token.is_empty()).then_some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load_with_defaults() {
        let config = Config::load_for_test(&[("api.base_url", "https://admin.example.com/api")])
            .expect("Failed to load config");

        assert_eq!(config.api.base_url, "https://admin.example.com/api");
        assert_eq!(config.api.timeout_ms, 10_000);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_override() {
        let config = Config::load_for_test(&[
            ("api.base_url", "http://localhost:3000"),
            ("api.timeout_ms", "2500"),
            ("logging.format", "json"),
        ])
        .expect("Failed to load config");

        assert_eq!(config.api.timeout_ms, 2500);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_config_validation_missing_base_url() {
        let config = Config::load_for_test(&[]).expect("Failed to load config");
        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("ADMIN__API__BASE_URL"));
    }

    #[test]
    fn test_config_validation_bad_scheme() {
        let config = Config::load_for_test(&[("api.base_url", "ftp://admin.example.com")])
            .expect("Failed to load config");

        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("http://"));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = Config::load_for_test(&[
            ("api.base_url", "http://localhost:3000"),
            ("api.timeout_ms", "0"),
        ])
        .expect("Failed to load config");

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bearer_token() {
        let mut config = Config::load_for_test(&[]).expect("Failed to load config");
        assert_eq!(config.api.bearer_token(), None);

        config.api.token = "  secret ".to_string();
        assert_eq!(config.api.bearer_token(), Some("secret"));
    }
}
