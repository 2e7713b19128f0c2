//! Remaining-time core: pure job-phase state machine, estimator and display projection.
mod estimate;
mod frame;
mod phase;
mod sample;
mod state;
mod update;

pub use estimate::{
    EstimateState, EMA_SAMPLE_CAP, MAX_SAMPLE_COUNT, NEW_JOB_DROP_PERCENT, REGRESSION_HOLD_LIMIT,
};
pub use frame::{project, DisplayFrame, Staleness, STALE_AFTER_CADENCES};
pub use phase::{next_phase, JobPhase, JobTracker, FAILURES_BEFORE_DISCONNECT};
pub use sample::{ApiFailure, JobSample, PollOutcome, TransportFailure};
pub use state::MonitorState;
pub use update::update;
