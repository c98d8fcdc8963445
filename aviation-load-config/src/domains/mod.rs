//! Domain-specific configuration modules

pub mod endpoints;
pub mod http;
pub mod load;
pub mod logging;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Complete harness configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadTestConfig {
    /// Services under test
    pub endpoints: endpoints::EndpointsConfig,

    /// HTTP client configuration
    pub http: http::HttpConfig,

    /// Virtual-user ramp schedule
    pub load: load::LoadProfile,

    /// Logging configuration
    pub logging: logging::LoggingConfig,
}

impl LoadTestConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.endpoints.validate()?;
        self.http.validate()?;
        self.load.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = LoadTestConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
