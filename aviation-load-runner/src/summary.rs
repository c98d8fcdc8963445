//! End-of-run summary

use aviation_load_http::{CheckSummary, HttpMetricsSummary};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IterationSummary {
    pub completed: u64,
    pub failed: u64,
}

impl IterationSummary {
    pub fn total(&self) -> u64 {
        self.completed + self.failed
    }
}

/// Everything a finished run reports, serializable to JSON
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub entry_point: String,
    pub duration_secs: f64,
    pub max_vus: usize,
    pub iterations: IterationSummary,
    pub checks: Vec<CheckSummary>,
    pub http: HttpMetricsSummary,
}

impl RunSummary {
    /// Failed evaluations across all checks
    pub fn checks_failed(&self) -> u64 {
        self.checks.iter().map(|c| c.fails).sum()
    }

    pub fn checks_passed(&self) -> u64 {
        self.checks.iter().map(|c| c.passes).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {:.1}s, up to {} VUs",
            self.entry_point, self.duration_secs, self.max_vus
        )?;
        writeln!(f)?;

        for check in &self.checks {
            let mark = if check.fails == 0 { '✓' } else { '✗' };
            write!(f, "  {} {}", mark, check.name)?;
            if check.fails > 0 {
                write!(
                    f,
                    "\n    ↳ {:.0}% ✓ {} / ✗ {}",
                    check.pass_rate() * 100.0,
                    check.passes,
                    check.fails
                )?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        let total_checks = self.checks_passed() + self.checks_failed();
        let check_rate = if total_checks > 0 {
            self.checks_passed() as f64 / total_checks as f64 * 100.0
        } else {
            0.0
        };
        let http = &self.http;
        writeln!(
            f,
            "  checks.........: {:.2}% ✓ {} ✗ {}",
            check_rate,
            self.checks_passed(),
            self.checks_failed()
        )?;
        writeln!(
            f,
            "  http_req_duration: avg={:.2}ms min={:.2}ms med={:.2}ms max={:.2}ms p(95)={:.2}ms p(99)={:.2}ms",
            http.average_response_time_ms,
            http.min_response_time_ms,
            http.p50_response_time_ms,
            http.max_response_time_ms,
            http.p95_response_time_ms,
            http.p99_response_time_ms
        )?;
        writeln!(
            f,
            "  http_req_failed: {:.2}% ({} of {})",
            http.error_rate * 100.0,
            http.failed_requests,
            http.total_requests
        )?;
        writeln!(f, "  http_reqs......: {} {:.2}/s", http.total_requests, http.requests_per_second)?;
        write!(
            f,
            "  iterations.....: {} ({} failed)",
            self.iterations.total(),
            self.iterations.failed
        )
    }
}
