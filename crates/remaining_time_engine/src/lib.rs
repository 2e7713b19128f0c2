//! Remaining-time engine: printer API polling and the background monitor loop.
mod backoff;
mod config;
mod engine;
mod fetch;
mod poller;
mod response;
mod types;

pub use backoff::Backoff;
pub use config::{ConfigError, PollSettings, PrinterConfig, PLACEHOLDER_CREDENTIALS};
pub use engine::{MonitorHandle, StartError};
pub use fetch::{JobClient, ReqwestJobClient, API_KEY_HEADER, JOB_PATH};
pub use poller::StatusPoller;
pub use response::parse_job;
pub use types::{ApiResponse, ConnectionState, ErrorReason, FailureKind, FetchError};
