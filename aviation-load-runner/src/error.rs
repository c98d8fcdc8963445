//! Runner error types

use aviation_load_config::ConfigError;
use aviation_load_http::HttpError;
use aviation_load_scenarios::ScenarioError;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] HttpError),

    /// The one-time setup failed; no load was generated
    #[error("Setup for '{entry}' failed: {source}")]
    Setup {
        entry: String,
        #[source]
        source: ScenarioError,
    },
}
