use std::time::{Duration, Instant};

use monitor_logging::{monitor_debug, monitor_info, monitor_warn};
use remaining_time_core::{ApiFailure, PollOutcome, TransportFailure};
use tokio::sync::watch;

use crate::response::parse_job;
use crate::{
    Backoff, ConnectionState, ErrorReason, FailureKind, FetchError, JobClient, PollSettings,
};

/// Issues one job request per call and owns connection state and backoff.
///
/// The poller never schedules itself; the caller decides when to call
/// [`StatusPoller::poll`] and asks [`StatusPoller::next_delay`] how long to wait.
/// Every connection change, including `Connecting` while a request is in
/// flight, is also published to [`StatusPoller::watch_connection`] receivers.
pub struct StatusPoller<C> {
    client: C,
    backoff: Backoff,
    connection: ConnectionState,
    connection_tx: watch::Sender<ConnectionState>,
    request_timeout: Duration,
}

impl<C: JobClient> StatusPoller<C> {
    pub fn new(client: C, settings: &PollSettings) -> Self {
        Self {
            client,
            backoff: Backoff::new(settings.cadence(), settings.max_backoff_multiplier),
            connection: ConnectionState::Disconnected,
            connection_tx: watch::Sender::new(ConnectionState::Disconnected),
            request_timeout: settings.request_timeout(),
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn watch_connection(&self) -> watch::Receiver<ConnectionState> {
        self.connection_tx.subscribe()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.backoff.consecutive_failures()
    }

    pub fn next_delay(&self) -> Duration {
        self.backoff.next_delay()
    }

    pub async fn poll(&mut self, now: Instant) -> PollOutcome {
        let previous = self.connection;
        if previous == ConnectionState::Disconnected {
            monitor_debug!("connecting to printer");
            self.set_connection(ConnectionState::Connecting);
        }

        let request = tokio::time::timeout(self.request_timeout, self.client.fetch_job());
        let result = match request.await {
            Ok(result) => result,
            Err(_) => Err(FetchError::new(
                FailureKind::Timeout,
                format!("no response within {:?}", self.request_timeout),
            )),
        };

        let outcome = match result {
            Ok(response) if response.is_success() => match parse_job(&response.body, now) {
                Ok(sample) => PollOutcome::Sample(sample),
                Err(err) => {
                    monitor_warn!("could not parse job response: {}", err);
                    PollOutcome::ApiError(ApiFailure::Parse)
                }
            },
            Ok(response) => PollOutcome::ApiError(ApiFailure::Status(response.status)),
            Err(err) => {
                monitor_debug!("job request failed: {}", err);
                match err.kind {
                    FailureKind::TooLarge { .. } => PollOutcome::ApiError(ApiFailure::Oversized),
                    FailureKind::Timeout => PollOutcome::TransportError(TransportFailure::Timeout),
                    FailureKind::Connect => {
                        PollOutcome::TransportError(TransportFailure::Unreachable)
                    }
                    FailureKind::Network => PollOutcome::TransportError(TransportFailure::Network),
                }
            }
        };

        self.record(&outcome, previous);
        outcome
    }

    fn record(&mut self, outcome: &PollOutcome, previous: ConnectionState) {
        let next = match outcome {
            PollOutcome::Sample(_) => {
                self.backoff.reset();
                ConnectionState::Connected
            }
            PollOutcome::ApiError(ApiFailure::Parse | ApiFailure::Oversized) => {
                self.backoff.record_failure();
                previous
            }
            PollOutcome::ApiError(failure) => {
                self.backoff.record_failure();
                ConnectionState::Error(ErrorReason::Api(*failure))
            }
            PollOutcome::TransportError(failure) => {
                self.backoff.record_failure();
                ConnectionState::Error(ErrorReason::Transport(*failure))
            }
        };

        if next != previous {
            match next {
                ConnectionState::Error(reason) => monitor_warn!(
                    "printer connection error ({}); {} consecutive failure(s), next poll in {:?}",
                    reason,
                    self.backoff.consecutive_failures(),
                    self.backoff.next_delay()
                ),
                state => monitor_info!("printer connection {:?}", state),
            }
        }
        self.set_connection(next);
    }

    fn set_connection(&mut self, state: ConnectionState) {
        self.connection = state;
        self.connection_tx.send_replace(state);
    }
}
