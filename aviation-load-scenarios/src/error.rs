//! Scenario error types

/// Fatal scenario failures. Everything else is recorded as a failed check.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Organization creation did not return the identifiers later steps need
    #[error("Failed to create organization: {0}")]
    Provisioning(String),

    #[error("Unknown entry point '{0}' (expected one of: aircraft, flights, router, gateway, auth)")]
    UnknownEntryPoint(String),
}
