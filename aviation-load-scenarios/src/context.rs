//! Shared handles every scenario call needs

use aviation_load_config::EndpointsConfig;
use aviation_load_http::{CheckRegistry, GraphqlExecutor, HttpClient};
use std::sync::Arc;

/// Transport, check registry and endpoint configuration for one run.
/// Cheap to clone; every virtual user holds its own copy.
#[derive(Clone)]
pub struct ScenarioContext {
    pub http: Arc<dyn HttpClient>,
    pub checks: Arc<CheckRegistry>,
    pub endpoints: Arc<EndpointsConfig>,
}

impl ScenarioContext {
    pub fn new(
        http: Arc<dyn HttpClient>,
        checks: Arc<CheckRegistry>,
        endpoints: Arc<EndpointsConfig>,
    ) -> Self {
        Self {
            http,
            checks,
            endpoints,
        }
    }

    pub fn graphql(&self) -> GraphqlExecutor<'_> {
        GraphqlExecutor::new(self.http.as_ref(), &self.checks)
    }

    /// Record a scenario-level check
    pub fn check(&self, name: &str, passed: bool) -> bool {
        self.checks.check(name, passed)
    }
}

impl std::fmt::Debug for ScenarioContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioContext")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
