//! Virtual-user ramp schedule

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// One ramp stage: move linearly to `target` virtual users over `duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(with = "humantime_serde")]
    pub duration: Duration,
    pub target: usize,
}

impl Stage {
    pub fn new(duration: Duration, target: usize) -> Self {
        Self { duration, target }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            humantime::format_duration(self.duration),
            self.target
        )
    }
}

/// Parses `<duration>:<target>`, e.g. `30s:5` or `1m30s:10`
impl FromStr for Stage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stage_error = |message: String| ConfigError::StageError {
            stage: s.to_string(),
            message,
        };

        let (duration, target) = s
            .trim()
            .rsplit_once(':')
            .ok_or_else(|| stage_error("expected <duration>:<target>".to_string()))?;

        let duration = humantime::parse_duration(duration.trim())
            .map_err(|e| stage_error(format!("bad duration: {}", e)))?;
        let target = target
            .trim()
            .parse()
            .map_err(|e| stage_error(format!("bad target: {}", e)))?;

        Ok(Stage { duration, target })
    }
}

/// Parse a comma-separated stage list such as `10s:1,30s:5,10s:0`
pub fn parse_stages(list: &str) -> ConfigResult<Vec<Stage>> {
    list.split(',')
        .filter(|part| !part.trim().is_empty())
        .map(Stage::from_str)
        .collect()
}

/// Load profile: ramp stages plus the pause each virtual user takes between iterations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadProfile {
    /// Virtual users active at t=0, before the first stage starts ramping
    pub start_vus: usize,

    pub stages: Vec<Stage>,

    /// Sleep after every iteration
    #[serde(with = "humantime_serde")]
    pub think_time: Duration,
}

impl Default for LoadProfile {
    fn default() -> Self {
        Self {
            start_vus: 1,
            stages: vec![Stage::new(Duration::from_secs(10), 1)],
            think_time: Duration::from_secs(1),
        }
    }
}

impl LoadProfile {
    /// Total wall-clock length of the load phase
    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.duration).sum()
    }

    /// Highest number of virtual users the profile ever asks for
    pub fn max_target(&self) -> usize {
        self.stages
            .iter()
            .map(|s| s.target)
            .fold(self.start_vus, usize::max)
    }

    /// Number of virtual users that should be active `elapsed` into the run.
    ///
    /// Interpolates linearly inside the current stage, starting from the
    /// previous stage's target (or `start_vus`), rounded to the nearest user.
    /// Returns 0 once the profile is over.
    pub fn target_at(&self, elapsed: Duration) -> usize {
        let mut stage_start = Duration::ZERO;
        let mut from = self.start_vus;

        for stage in &self.stages {
            let stage_end = stage_start + stage.duration;
            if elapsed < stage_end {
                let progress = (elapsed - stage_start).as_secs_f64() / stage.duration.as_secs_f64();
                let span = stage.target as f64 - from as f64;
                return (from as f64 + span * progress).round().max(0.0) as usize;
            }
            stage_start = stage_end;
            from = stage.target;
        }

        0
    }
}

impl Validatable for LoadProfile {
    fn validate(&self) -> ConfigResult<()> {
        if self.stages.is_empty() {
            return Err(self.validation_error("at least one stage is required"));
        }
        if self.total_duration().is_zero() {
            return Err(self.validation_error("stages must add up to a non-zero duration"));
        }
        if self.max_target() == 0 {
            return Err(self.validation_error("no stage targets any virtual users"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}
