use std::time::Instant;

use monitor_logging::monitor_debug;

use crate::{JobPhase, JobSample};

/// Sample count at which the EMA weight stops shrinking (new-sample weight >= 1/5).
pub const EMA_SAMPLE_CAP: u32 = 4;
/// Upper bound for the stored sample count.
pub const MAX_SAMPLE_COUNT: u32 = 1000;
/// Consecutive backwards samples after which the lower completion is trusted.
pub const REGRESSION_HOLD_LIMIT: u32 = 2;
/// A completion drop of at least this many points is read as a new job.
pub const NEW_JOB_DROP_PERCENT: f64 = 50.0;

/// Smoothed remaining-time estimate for the current print.
///
/// The value is kept as fractional seconds internally so repeated blending does
/// not accumulate rounding error; callers only see whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EstimateState {
    smoothed_secs: Option<f64>,
    last_update: Option<Instant>,
    sample_count: u32,
    last_completion: Option<f64>,
    regressions: u32,
}

impl EstimateState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smoothed_secs_remaining(&self) -> Option<u64> {
        self.smoothed_secs.map(|secs| secs.max(0.0).round() as u64)
    }

    pub fn last_update(&self) -> Option<Instant> {
        self.last_update
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Remaining seconds counted down to `now` from the last update.
    pub fn remaining_at(&self, now: Instant) -> Option<u64> {
        self.projected_at(now).map(|secs| secs.round() as u64)
    }

    /// Folds one sample into the estimate. Any phase other than `Printing`
    /// resets the estimate.
    ///
    /// A sample whose completion went backwards is ignored once. A second one
    /// in a row, or a drop large enough to mean a new job, re-seeds the
    /// estimate from that sample.
    pub fn update(self, sample: &JobSample, phase: JobPhase) -> Self {
        if phase != JobPhase::Printing {
            return Self::default();
        }

        let sample_count = self.sample_count.saturating_add(1).min(MAX_SAMPLE_COUNT);

        if let Some(previous) = self.last_completion {
            let drop = previous - sample.completion_percent;
            if drop > 0.0 {
                let regressions = self.regressions + 1;
                if drop < NEW_JOB_DROP_PERCENT && regressions < REGRESSION_HOLD_LIMIT {
                    monitor_debug!(
                        "completion went backwards ({:.2}% -> {:.2}%), holding estimate",
                        previous,
                        sample.completion_percent
                    );
                    return Self {
                        sample_count,
                        regressions,
                        ..self
                    };
                }
                monitor_debug!(
                    "completion restarted at {:.2}% (was {:.2}%), re-seeding estimate",
                    sample.completion_percent,
                    previous
                );
                return Self::default().update(sample, phase);
            }
        }

        let projected = self.projected_at(sample.fetched_at);
        let smoothed = match (raw_remaining_secs(sample), projected) {
            (Some(raw), Some(previous)) => {
                let alpha = ema_weight(self.sample_count);
                Some(alpha * raw + (1.0 - alpha) * previous)
            }
            (Some(raw), None) => Some(raw),
            (None, previous) => previous,
        };

        Self {
            smoothed_secs: smoothed.map(|secs| secs.max(0.0)),
            last_update: Some(sample.fetched_at),
            sample_count,
            last_completion: Some(sample.completion_percent),
            regressions: 0,
        }
    }

    fn projected_at(&self, now: Instant) -> Option<f64> {
        let smoothed = self.smoothed_secs?;
        let elapsed = self
            .last_update
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0);
        Some((smoothed - elapsed).max(0.0))
    }
}

/// Weight given to the incoming sample after `previous_count` samples.
fn ema_weight(previous_count: u32) -> f64 {
    1.0 / (f64::from(previous_count.min(EMA_SAMPLE_CAP)) + 1.0)
}

/// Server-reported time left, or a linear extrapolation for firmware that omits it.
fn raw_remaining_secs(sample: &JobSample) -> Option<f64> {
    if let Some(left) = sample.print_time_left_secs {
        return Some(left as f64);
    }
    let completion = sample.completion_percent;
    if completion <= 0.0 {
        return None;
    }
    let elapsed = sample.print_time_elapsed_secs as f64;
    Some(elapsed / completion * (100.0 - completion))
}
