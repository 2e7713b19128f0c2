//! Decoding of the printer's `/api/job` body.
//!
//! Two shapes are accepted for `state`: the plain text OctoPrint returns
//! ("Printing", "Paused", "Operational", ...) and an object carrying
//! `flags.{printing,paused,error,closedOrError}`. A printer that is offline or
//! closed is reported through the error flag rather than as idle. `progress`
//! must be present, but each of its fields may be `null` while no job is
//! loaded.

use std::time::Instant;

use remaining_time_core::JobSample;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct JobResponse {
    state: StateField,
    progress: Progress,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StateField {
    Text(String),
    Detailed {
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        flags: Option<Flags>,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Flags {
    #[serde(default)]
    printing: bool,
    #[serde(default)]
    paused: bool,
    #[serde(default)]
    pausing: bool,
    #[serde(default)]
    error: bool,
    #[serde(default)]
    closed_or_error: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Progress {
    #[serde(default)]
    completion: Option<f64>,
    #[serde(default)]
    print_time: Option<f64>,
    #[serde(default)]
    print_time_left: Option<f64>,
}

#[derive(Debug, Default, PartialEq, Eq)]
struct StateFlags {
    printing: bool,
    paused: bool,
    error: bool,
}

impl From<Flags> for StateFlags {
    fn from(flags: Flags) -> Self {
        Self {
            printing: flags.printing && !(flags.paused || flags.pausing),
            paused: flags.paused || flags.pausing,
            error: flags.error || flags.closed_or_error,
        }
    }
}

/// Parses a job response body into a sample stamped with `fetched_at`.
pub fn parse_job(body: &[u8], fetched_at: Instant) -> Result<JobSample, serde_json::Error> {
    let response: JobResponse = serde_json::from_slice(body)?;
    let flags = match response.state {
        StateField::Text(text) => flags_from_text(&text),
        StateField::Detailed {
            flags: Some(flags), ..
        } => flags.into(),
        StateField::Detailed {
            text: Some(text),
            flags: None,
        } => flags_from_text(&text),
        StateField::Detailed {
            text: None,
            flags: None,
        } => StateFlags::default(),
    };

    let progress = response.progress;
    let sample = JobSample::new(
        flags.printing,
        flags.paused,
        progress.completion.unwrap_or(0.0),
        whole_seconds(progress.print_time).unwrap_or(0),
        whole_seconds(progress.print_time_left),
        fetched_at,
    )
    .with_error(flags.error);
    Ok(sample)
}

fn whole_seconds(value: Option<f64>) -> Option<u64> {
    value
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| secs.round() as u64)
}

fn flags_from_text(text: &str) -> StateFlags {
    let lowered = text.trim().to_ascii_lowercase();
    let unavailable = ["offline", "closed"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix));
    if unavailable || lowered.contains("error") {
        return StateFlags {
            error: true,
            ..StateFlags::default()
        };
    }
    if lowered.starts_with("paus") {
        return StateFlags {
            paused: true,
            ..StateFlags::default()
        };
    }
    let printing = ["printing", "starting", "resuming", "finishing", "cancelling"]
        .iter()
        .any(|prefix| lowered.starts_with(prefix));
    StateFlags {
        printing,
        ..StateFlags::default()
    }
}
