use crate::{EstimateState, JobPhase, MonitorState, PollOutcome};

/// Pure update function: folds one poll outcome into the monitor state.
///
/// Outcomes must be applied in the order the polls were issued.
pub fn update(mut state: MonitorState, outcome: &PollOutcome) -> MonitorState {
    state.tracker = state.tracker.apply(outcome);
    let phase = state.tracker.phase();

    match outcome {
        PollOutcome::Sample(sample) => {
            state.estimate = state.estimate.update(sample, phase);
            state.last_successful_fetch = Some(sample.fetched_at);
        }
        PollOutcome::ApiError(_) | PollOutcome::TransportError(_) => {
            // A held Printing phase keeps counting down from the last estimate.
            if phase != JobPhase::Printing {
                state.estimate = EstimateState::default();
            }
        }
    }

    state
}
