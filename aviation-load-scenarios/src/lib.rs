//! Scenario orchestration for the aviation services
//!
//! Scenarios are fixed sequences of dependent requests: provision an
//! organization, log in, create an aircraft, create a flight bound to that
//! aircraft. Each step records named checks instead of failing, so a single
//! iteration can report partial failure without stopping the run. The only
//! fatal condition is an organization that cannot be provisioned.
//!
//! Entry points compose the scenarios per service boundary and decide which
//! authentication headers apply: trust headers for direct router/service
//! calls, bearer tokens for the gateway.

pub mod aircraft;
pub mod auth;
pub mod auth_headers;
pub mod context;
pub mod documents;
pub mod entry;
pub mod error;
pub mod flights;
pub mod identity;
pub mod organization;
pub mod random;
mod rest;

pub use aircraft::run_aircraft_scenario;
pub use auth::run_authentication_scenario;
pub use auth_headers::{build_auth_headers, AuthContext, HeaderStrategy, ScenarioTarget};
pub use context::ScenarioContext;
pub use entry::{EntryPoint, EntryPointKind, Fixture};
pub use error::ScenarioError;
pub use flights::run_flight_scenario;
pub use identity::{AdminUser, IdentityContext, Organization};
pub use organization::create_organization;
pub use random::{RandomSource, RngSource, SequenceSource, ValueGenerator};
