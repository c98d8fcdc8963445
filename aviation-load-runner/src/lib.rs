//! Load generation for the aviation scenarios
//!
//! A run executes an entry point's setup once, then keeps a ramping pool of
//! virtual users iterating the entry point until the load profile ends, and
//! finally reports iteration counts, check outcomes and request metrics.

pub mod error;
pub mod runner;
pub mod summary;

pub use error::RunnerError;
pub use runner::LoadRunner;
pub use summary::{IterationSummary, RunSummary};
