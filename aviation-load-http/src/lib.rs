//! HTTP plumbing for the aviation load harness
//!
//! This crate provides the transport seam ([`HttpClient`]) with a
//! reqwest-backed implementation, named pass/fail checks, per-request latency
//! metrics and the GraphQL request executor built on top of them.

pub mod checks;
pub mod client;
pub mod config;
pub mod errors;
pub mod graphql;
pub mod metrics;

// Re-export main types for convenience
pub use checks::{CheckRegistry, CheckSummary};
pub use client::{Headers, HttpClient, HttpManager, HttpResponse};
pub use config::HttpConfig;
pub use errors::HttpError;
pub use graphql::{GraphqlDocument, GraphqlErrorDetail, GraphqlExecutor, GraphqlOutcome};
pub use metrics::{HttpMetricsSummary, RequestMetrics};
