//! Request latency and throughput tracking

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct EndpointStats {
    requests: u64,
    failed: u64,
    total_ms: f64,
}

/// Collects one sample per HTTP request issued during a run
#[derive(Debug, Default)]
pub struct RequestMetrics {
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    bytes_received: AtomicU64,
    response_times_ms: Mutex<Vec<f64>>,
    status_codes: Mutex<BTreeMap<u16, u64>>,
    endpoints: Mutex<BTreeMap<String, EndpointStats>>,
}

/// Per-endpoint figures in a summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointSummary {
    pub requests: u64,
    pub failed: u64,
    pub average_response_time_ms: f64,
}

/// Aggregated request metrics for a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpMetricsSummary {
    pub total_requests: u64,
    pub failed_requests: u64,
    pub error_rate: f64,
    pub requests_per_second: f64,
    pub bytes_received: u64,
    pub min_response_time_ms: f64,
    pub average_response_time_ms: f64,
    pub p50_response_time_ms: f64,
    pub p95_response_time_ms: f64,
    pub p99_response_time_ms: f64,
    pub max_response_time_ms: f64,
    pub status_codes: BTreeMap<u16, u64>,
    pub endpoints: BTreeMap<String, EndpointSummary>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one request. Status 0 means no response was received; any
    /// status outside 200..400 counts as a failed request.
    pub fn record_request(&self, url: &str, elapsed: Duration, status: u16, response_size: usize) {
        let failed = !(200..400).contains(&status);
        let elapsed_ms = elapsed.as_micros() as f64 / 1000.0;

        if failed {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes_received
            .fetch_add(response_size as u64, Ordering::Relaxed);

        self.response_times_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(elapsed_ms);

        *self
            .status_codes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(status)
            .or_insert(0) += 1;

        let mut endpoints = self.endpoints.lock().unwrap_or_else(PoisonError::into_inner);
        let stats = endpoints.entry(url.to_string()).or_default();
        stats.requests += 1;
        stats.total_ms += elapsed_ms;
        if failed {
            stats.failed += 1;
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.successful_requests.load(Ordering::Relaxed) + self.failed_requests.load(Ordering::Relaxed)
    }

    /// Summarize everything recorded so far over a run of length `run_duration`
    pub fn summary(&self, run_duration: Duration) -> HttpMetricsSummary {
        let mut response_times = self
            .response_times_ms
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        response_times.sort_by(|a, b| a.total_cmp(b));

        let successful = self.successful_requests.load(Ordering::Relaxed);
        let failed = self.failed_requests.load(Ordering::Relaxed);
        let total = successful + failed;

        let percentile = |p: usize| -> f64 {
            if response_times.is_empty() {
                return 0.0;
            }
            let index = (response_times.len() * p / 100).min(response_times.len() - 1);
            response_times[index]
        };

        let average = if response_times.is_empty() {
            0.0
        } else {
            response_times.iter().sum::<f64>() / response_times.len() as f64
        };

        let seconds = run_duration.as_secs_f64();

        let endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(url, stats)| {
                (
                    url.clone(),
                    EndpointSummary {
                        requests: stats.requests,
                        failed: stats.failed,
                        average_response_time_ms: if stats.requests > 0 {
                            stats.total_ms / stats.requests as f64
                        } else {
                            0.0
                        },
                    },
                )
            })
            .collect();

        HttpMetricsSummary {
            total_requests: total,
            failed_requests: failed,
            error_rate: if total > 0 {
                failed as f64 / total as f64
            } else {
                0.0
            },
            requests_per_second: if seconds > 0.0 {
                total as f64 / seconds
            } else {
                0.0
            },
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            min_response_time_ms: response_times.first().copied().unwrap_or(0.0),
            average_response_time_ms: average,
            p50_response_time_ms: percentile(50),
            p95_response_time_ms: percentile(95),
            p99_response_time_ms: percentile(99),
            max_response_time_ms: response_times.last().copied().unwrap_or(0.0),
            status_codes: self
                .status_codes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            endpoints,
        }
    }
}
