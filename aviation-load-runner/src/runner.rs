//! Staged virtual-user runner

use crate::error::RunnerError;
use crate::summary::{IterationSummary, RunSummary};
use aviation_load_config::{LoadProfile, LoadTestConfig};
use aviation_load_http::{CheckRegistry, HttpClient, HttpManager, RequestMetrics};
use aviation_load_scenarios::{EntryPoint, Fixture, ScenarioContext, ValueGenerator};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{sleep, Instant};
use tracing::{debug, error, info, warn};

/// How often an idle virtual user re-checks whether the ramp has reached it
const IDLE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Default)]
struct IterationCounters {
    completed: AtomicU64,
    failed: AtomicU64,
}

impl IterationCounters {
    fn snapshot(&self) -> IterationSummary {
        IterationSummary {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Shared, read-only state handed to every virtual user
struct VuShared {
    ctx: ScenarioContext,
    entry: Arc<dyn EntryPoint>,
    fixture: Fixture,
    profile: LoadProfile,
    counters: IterationCounters,
    started: Instant,
}

/// Drives one entry point through the configured load profile
#[derive(Debug, Clone)]
pub struct LoadRunner {
    config: LoadTestConfig,
}

impl LoadRunner {
    pub fn new(config: LoadTestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoadTestConfig {
        &self.config
    }

    /// Run `entry` with a reqwest transport built from the HTTP configuration
    pub async fn run(&self, entry: Arc<dyn EntryPoint>) -> Result<RunSummary, RunnerError> {
        self.config.validate_all()?;

        let metrics = Arc::new(RequestMetrics::new());
        let http = HttpManager::with_config(self.config.http.clone().into())?
            .with_metrics(metrics.clone());

        self.run_with_client(entry, Arc::new(http), metrics).await
    }

    /// Run `entry` over a caller-supplied transport. `metrics` is reported in
    /// the summary and should be the sink the transport records into.
    pub async fn run_with_client(
        &self,
        entry: Arc<dyn EntryPoint>,
        http: Arc<dyn HttpClient>,
        metrics: Arc<RequestMetrics>,
    ) -> Result<RunSummary, RunnerError> {
        let profile = self.config.load.clone();
        let checks = Arc::new(CheckRegistry::new());
        let ctx = ScenarioContext::new(
            http,
            checks.clone(),
            Arc::new(self.config.endpoints.clone()),
        );

        let stages: Vec<String> = profile.stages.iter().map(ToString::to_string).collect();
        info!(
            entry = entry.name(),
            stages = %stages.join(","),
            think_time = ?profile.think_time,
            "Starting load run"
        );

        let mut setup_random = ValueGenerator::from_entropy();
        let fixture = entry
            .setup(&ctx, &mut setup_random)
            .await
            .map_err(|source| RunnerError::Setup {
                entry: entry.name().to_string(),
                source,
            })?;
        debug!(
            has_identity = fixture.identity.is_some(),
            aircraft_id = ?fixture.aircraft_id,
            "Setup complete"
        );

        let max_vus = profile.max_target();
        let shared = Arc::new(VuShared {
            ctx,
            entry: entry.clone(),
            fixture,
            profile,
            counters: IterationCounters::default(),
            started: Instant::now(),
        });

        let mut vus = JoinSet::new();
        for vu in 0..max_vus {
            vus.spawn(run_virtual_user(vu, shared.clone()));
        }

        while let Some(result) = vus.join_next().await {
            if let Err(e) = result {
                error!("Virtual user task failed: {}", e);
            }
        }

        let duration = shared.started.elapsed();
        let iterations = shared.counters.snapshot();
        info!(
            entry = entry.name(),
            completed = iterations.completed,
            failed = iterations.failed,
            duration = ?duration,
            "Load run finished"
        );

        Ok(RunSummary {
            entry_point: entry.name().to_string(),
            duration_secs: duration.as_secs_f64(),
            max_vus,
            iterations,
            checks: checks.summary(),
            http: metrics.summary(duration),
        })
    }
}

/// Iterate while the ramp includes this user; stop when the profile ends.
/// An iteration in flight at the deadline is allowed to finish.
async fn run_virtual_user(vu: usize, shared: Arc<VuShared>) {
    let total = shared.profile.total_duration();
    let mut random = ValueGenerator::from_entropy();

    loop {
        let elapsed = shared.started.elapsed();
        if elapsed >= total {
            break;
        }

        if vu >= shared.profile.target_at(elapsed) {
            sleep(IDLE_POLL.min(total - elapsed)).await;
            continue;
        }

        match shared
            .entry
            .iteration(&shared.ctx, &mut random, &shared.fixture)
            .await
        {
            Ok(()) => {
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(vu, entry = shared.entry.name(), "Iteration failed: {}", e);
            }
        }

        let remaining = total.saturating_sub(shared.started.elapsed());
        sleep(shared.profile.think_time.min(remaining)).await;
    }

    debug!(vu, "Virtual user stopped");
}
