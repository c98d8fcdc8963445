//! Named pass/fail checks
//!
//! A check never aborts the calling code: it records the outcome and hands the
//! boolean back so the caller can keep going. Counts are shared by every
//! virtual user of a run.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy)]
struct CheckCounts {
    passes: u64,
    fails: u64,
}

/// Aggregated outcome of one named check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub name: String,
    pub passes: u64,
    pub fails: u64,
}

impl CheckSummary {
    pub fn total(&self) -> u64 {
        self.passes + self.fails
    }

    /// Share of passing evaluations, 0.0 when never evaluated
    pub fn pass_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.passes as f64 / self.total() as f64
        }
    }
}

/// Thread-safe registry of check outcomes
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Mutex<BTreeMap<String, CheckCounts>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one evaluation of `name` and return `passed`
    pub fn check(&self, name: &str, passed: bool) -> bool {
        let mut checks = self.checks.lock().unwrap_or_else(PoisonError::into_inner);
        let counts = checks.entry(name.to_string()).or_default();
        if passed {
            counts.passes += 1;
        } else {
            counts.fails += 1;
            debug!(check = name, "check failed");
        }
        passed
    }

    /// Snapshot of all checks, ordered by name
    pub fn summary(&self) -> Vec<CheckSummary> {
        let checks = self.checks.lock().unwrap_or_else(PoisonError::into_inner);
        checks
            .iter()
            .map(|(name, counts)| CheckSummary {
                name: name.clone(),
                passes: counts.passes,
                fails: counts.fails,
            })
            .collect()
    }

    /// Outcome of a single check, if it was ever evaluated
    pub fn get(&self, name: &str) -> Option<CheckSummary> {
        self.summary().into_iter().find(|c| c.name == name)
    }

    /// Total failed evaluations over all checks
    pub fn total_fails(&self) -> u64 {
        self.summary().iter().map(|c| c.fails).sum()
    }
}
