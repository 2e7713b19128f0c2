use monitor_logging::{monitor_debug, monitor_warn};

use crate::{JobSample, PollOutcome};

/// Consecutive failed polls after which the printer is shown as disconnected.
pub const FAILURES_BEFORE_DISCONNECT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Disconnected,
    Idle,
    Printing,
    Paused,
    Finished,
    Unknown,
}

/// Job lifecycle tracker: the current phase plus the failure streak that
/// decides when a held phase gives way to `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobTracker {
    phase: JobPhase,
    consecutive_failures: u32,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Folds one poll outcome into the tracker.
    pub fn apply(self, outcome: &PollOutcome) -> Self {
        let phase = next_phase(outcome, self.phase, self.consecutive_failures);
        let consecutive_failures = if outcome.is_failure() {
            self.consecutive_failures.saturating_add(1)
        } else {
            0
        };
        if phase != self.phase {
            monitor_debug!("job phase {:?} -> {:?}", self.phase, phase);
        }
        Self {
            phase,
            consecutive_failures,
        }
    }
}

/// Pure transition function.
///
/// `consecutive_failures` counts the failed polls seen before `outcome`.
pub fn next_phase(
    outcome: &PollOutcome,
    previous: JobPhase,
    consecutive_failures: u32,
) -> JobPhase {
    match outcome {
        PollOutcome::ApiError(_) | PollOutcome::TransportError(_) => {
            if consecutive_failures.saturating_add(1) >= FAILURES_BEFORE_DISCONNECT {
                JobPhase::Disconnected
            } else {
                previous
            }
        }
        PollOutcome::Sample(sample) => phase_from_sample(sample, previous),
    }
}

fn phase_from_sample(sample: &JobSample, previous: JobPhase) -> JobPhase {
    if previous == JobPhase::Printing && sample.is_complete() {
        return JobPhase::Finished;
    }
    // Finished is shown for exactly one cycle unless a new print has already started.
    let new_print = sample.printing && !sample.paused && !sample.is_complete();
    if previous == JobPhase::Finished && !new_print {
        return JobPhase::Idle;
    }

    match (sample.printing, sample.paused, sample.error) {
        (_, _, true) | (true, true, _) => {
            monitor_warn!(
                "unrecognised job state printing={} paused={} error={}",
                sample.printing,
                sample.paused,
                sample.error
            );
            JobPhase::Unknown
        }
        (false, true, false) => JobPhase::Paused,
        (true, false, false) => JobPhase::Printing,
        (false, false, false) => JobPhase::Idle,
    }
}
