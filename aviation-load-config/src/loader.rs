//! Configuration loading and environment variable handling

use crate::domains::load::parse_stages;
use crate::domains::LoadTestConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Configuration loader with environment variable support.
///
/// Endpoint URLs are read from the unprefixed variables the services are known
/// by (`FLIGHT_URL`, `AIRCRAFT_URL`, `ROUTER_URL`, `GATEWAY_URL`,
/// `AUTHENTICATION_URL`). Tuning knobs use the loader prefix, e.g.
/// `LOADTEST_HTTP_TIMEOUT`.
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "LOADTEST".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<LoadTestConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: LoadTestConfig = serde_yaml::from_str(&content)?;

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from defaults and environment variables only
    pub fn from_env(&self) -> ConfigResult<LoadTestConfig> {
        let mut config = LoadTestConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<LoadTestConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut LoadTestConfig) -> ConfigResult<()> {
        self.apply_endpoint_overrides(&mut config.endpoints);
        self.apply_http_overrides(&mut config.http)?;
        self.apply_load_overrides(&mut config.load)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply service URL overrides
    fn apply_endpoint_overrides(&self, config: &mut crate::domains::endpoints::EndpointsConfig) {
        let overrides = [
            ("FLIGHT_URL", &mut config.flight_service_url),
            ("AIRCRAFT_URL", &mut config.aircraft_service_url),
            ("ROUTER_URL", &mut config.router_url),
            ("GATEWAY_URL", &mut config.gateway_url),
            ("AUTHENTICATION_URL", &mut config.auth_service_url),
        ];

        for (name, target) in overrides {
            if let Ok(url) = std::env::var(name) {
                if !url.is_empty() {
                    *target = url;
                }
            }
        }
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            config.timeout = humantime::parse_duration(&timeout)
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_TIMEOUT: {}", e)))?;
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = verify_ssl
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid HTTP_VERIFY_SSL: {}", e)))?;
        }

        Ok(())
    }

    /// Apply load profile overrides
    fn apply_load_overrides(
        &self,
        config: &mut crate::domains::load::LoadProfile,
    ) -> ConfigResult<()> {
        if let Ok(stages) = self.get_env_var("STAGES") {
            config.stages = parse_stages(&stages)?;
        }

        if let Ok(vus) = self.get_env_var("START_VUS") {
            config.start_vus = vus
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid START_VUS: {}", e)))?;
        }

        if let Ok(think_time) = self.get_env_var("THINK_TIME") {
            config.think_time = humantime::parse_duration(&think_time)
                .map_err(|e| ConfigError::EnvError(format!("Invalid THINK_TIME: {}", e)))?;
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
