//! Domain-driven configuration for the aviation load-testing harness
//!
//! Configuration is split by functional domain (endpoints, HTTP client, load
//! profile, logging), each with defaults, validation and environment variable
//! overrides. A [`LoadTestConfig`] is built once at process start and passed
//! down explicitly; nothing below the binary reads the environment.

pub mod domains;
pub mod error;
pub mod loader;
pub mod validation;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    endpoints::EndpointsConfig,
    http::HttpConfig,
    load::{LoadProfile, Stage},
    logging::{LogFormat, LogLevel, LoggingConfig},
    LoadTestConfig,
};
