use std::time::{Duration, Instant};

use crate::{EstimateState, JobPhase};

/// A fetch older than this many poll cadences is shown as stale.
pub const STALE_AFTER_CADENCES: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Staleness {
    Fresh,
    Stale,
    /// No poll has succeeded yet.
    #[default]
    Unknown,
}

/// What the display shows for one refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayFrame {
    pub phase: JobPhase,
    pub seconds_remaining: Option<u64>,
    pub staleness: Staleness,
}

/// Pure projection of tracker and estimator state onto a frame.
pub fn project(
    phase: JobPhase,
    estimate: &EstimateState,
    last_successful_fetch: Option<Instant>,
    now: Instant,
    cadence: Duration,
) -> DisplayFrame {
    let stale_after = cadence * STALE_AFTER_CADENCES;
    let staleness = match last_successful_fetch {
        None => Staleness::Unknown,
        Some(fetched) if now.saturating_duration_since(fetched) > stale_after => Staleness::Stale,
        Some(_) => Staleness::Fresh,
    };

    let seconds_remaining = match phase {
        JobPhase::Printing => estimate.remaining_at(now),
        _ => None,
    };

    DisplayFrame {
        phase,
        seconds_remaining,
        staleness,
    }
}
