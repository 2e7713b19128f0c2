use std::time::{Duration, Instant};

use crate::{project, DisplayFrame, EstimateState, JobPhase, JobTracker};

/// Everything carried from one poll cycle to the next.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonitorState {
    pub(crate) tracker: JobTracker,
    pub(crate) estimate: EstimateState,
    pub(crate) last_successful_fetch: Option<Instant>,
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> JobPhase {
        self.tracker.phase()
    }

    pub fn tracker(&self) -> JobTracker {
        self.tracker
    }

    pub fn estimate(&self) -> &EstimateState {
        &self.estimate
    }

    pub fn last_successful_fetch(&self) -> Option<Instant> {
        self.last_successful_fetch
    }

    pub fn frame(&self, now: Instant, cadence: Duration) -> DisplayFrame {
        project(
            self.phase(),
            &self.estimate,
            self.last_successful_fetch,
            now,
            cadence,
        )
    }
}
