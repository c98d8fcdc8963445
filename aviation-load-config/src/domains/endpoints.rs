//! Target service endpoints

use crate::error::ConfigResult;
use crate::validation::{validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Base URLs of the five services under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// Flight service GraphQL endpoint
    pub flight_service_url: String,

    /// Aircraft service GraphQL endpoint
    pub aircraft_service_url: String,

    /// Federated graph router
    pub router_url: String,

    /// Gateway in front of the router; validates bearer tokens
    pub gateway_url: String,

    /// Authentication/organization REST service base URL
    pub auth_service_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            flight_service_url: "http://localhost:8081/graphql".to_string(),
            aircraft_service_url: "http://localhost:8080/graphql".to_string(),
            router_url: "http://localhost:4000".to_string(),
            gateway_url: "http://localhost:1000".to_string(),
            auth_service_url: "http://localhost:8000".to_string(),
        }
    }
}

impl EndpointsConfig {
    /// Whether `url` addresses the gateway. Trailing slashes are ignored.
    pub fn is_gateway(&self, url: &str) -> bool {
        url.trim_end_matches('/') == self.gateway_url.trim_end_matches('/')
    }
}

impl Validatable for EndpointsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.flight_service_url, "flight_service_url", self.domain_name())?;
        validate_url(&self.aircraft_service_url, "aircraft_service_url", self.domain_name())?;
        validate_url(&self.router_url, "router_url", self.domain_name())?;
        validate_url(&self.gateway_url, "gateway_url", self.domain_name())?;
        validate_url(&self.auth_service_url, "auth_service_url", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "endpoints"
    }
}
