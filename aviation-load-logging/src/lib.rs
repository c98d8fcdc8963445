//! Logging setup for the aviation load harness
//!
//! All crates log through `tracing`; this crate installs the global
//! subscriber from a [`LoggingConfig`].

pub mod init;

pub use aviation_load_config::LoggingConfig;
pub use init::{build_env_filter, init_logging};
