use std::fmt;
use std::time::Instant;

/// One parsed `/api/job` response.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSample {
    pub printing: bool,
    pub paused: bool,
    pub error: bool,
    /// Clamped to `0.0..=100.0`.
    pub completion_percent: f64,
    pub print_time_elapsed_secs: u64,
    pub print_time_left_secs: Option<u64>,
    pub fetched_at: Instant,
}

impl JobSample {
    /// Builds a sample, clamping the completion into range and mapping NaN to 0.
    pub fn new(
        printing: bool,
        paused: bool,
        completion_percent: f64,
        print_time_elapsed_secs: u64,
        print_time_left_secs: Option<u64>,
        fetched_at: Instant,
    ) -> Self {
        Self {
            printing,
            paused,
            error: false,
            completion_percent: clamp_percent(completion_percent),
            print_time_elapsed_secs,
            print_time_left_secs,
            fetched_at,
        }
    }

    pub fn with_error(mut self, error: bool) -> Self {
        self.error = error;
        self
    }

    pub fn is_complete(&self) -> bool {
        self.completion_percent >= 100.0
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Sample(JobSample),
    ApiError(ApiFailure),
    TransportError(TransportFailure),
}

impl PollOutcome {
    pub fn is_failure(&self) -> bool {
        !matches!(self, PollOutcome::Sample(_))
    }
}

/// The server answered, but not with a usable job body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFailure {
    Status(u16),
    Parse,
    Oversized,
}

/// The request never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailure {
    Timeout,
    Unreachable,
    Network,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::Status(401) => write!(f, "http status 401 (check the api key)"),
            ApiFailure::Status(409) => write!(f, "http status 409 (printer not operational)"),
            ApiFailure::Status(code) => write!(f, "http status {code}"),
            ApiFailure::Parse => write!(f, "malformed job response"),
            ApiFailure::Oversized => write!(f, "job response too large"),
        }
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportFailure::Timeout => write!(f, "timeout"),
            TransportFailure::Unreachable => write!(f, "server unreachable"),
            TransportFailure::Network => write!(f, "network error"),
        }
    }
}
