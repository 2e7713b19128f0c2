use chrono::{DateTime, Local, TimeDelta};
use remaining_time_core::{DisplayFrame, JobPhase, Staleness};

use super::constants::*;

/// Text lines for one display refresh.
pub fn render(printer_name: &str, frame: &DisplayFrame, now: DateTime<Local>) -> Vec<String> {
    let mut header = fit(printer_name);
    if frame.staleness == Staleness::Stale {
        header = fit(&format!("{printer_name} {STALE_MARKER}"));
    }

    let remaining = match frame.seconds_remaining {
        Some(secs) => format_remaining(secs),
        None => NO_ESTIMATE.to_string(),
    };

    let footer = match (frame.staleness, frame.seconds_remaining) {
        (Staleness::Unknown, _) => WAITING_TEXT.to_string(),
        (_, Some(secs)) => match finish_time(now, secs) {
            Some(eta) => format!("done ~{}", eta.format("%H:%M")),
            None => String::new(),
        },
        (_, None) => String::new(),
    };

    vec![
        header,
        fit(phase_label(frame.phase)),
        fit(&remaining),
        fit(&footer),
    ]
}

fn phase_label(phase: JobPhase) -> &'static str {
    match phase {
        JobPhase::Disconnected => "Offline",
        JobPhase::Idle => "Idle",
        JobPhase::Printing => "Printing",
        JobPhase::Paused => "Paused",
        JobPhase::Finished => "Finished",
        JobPhase::Unknown => "Unknown",
    }
}

fn format_remaining(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

fn finish_time(now: DateTime<Local>, secs: u64) -> Option<DateTime<Local>> {
    let secs = i64::try_from(secs).ok()?;
    now.checked_add_signed(TimeDelta::try_seconds(secs)?)
}

fn fit(text: &str) -> String {
    text.chars().take(DISPLAY_COLUMNS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn printing_frame_shows_countdown_and_eta() {
        let frame = DisplayFrame {
            phase: JobPhase::Printing,
            seconds_remaining: Some(3725),
            staleness: Staleness::Fresh,
        };
        let lines = render("Voron", &frame, noon());
        assert_eq!(lines, vec!["Voron", "Printing", "01:02:05", "done ~13:02"]);
    }

    #[test]
    fn stale_frame_is_marked() {
        let frame = DisplayFrame {
            phase: JobPhase::Printing,
            seconds_remaining: None,
            staleness: Staleness::Stale,
        };
        let lines = render("Ender", &frame, noon());
        assert_eq!(lines[0], "Ender (stale)");
        assert_eq!(lines[2], NO_ESTIMATE);
        assert_eq!(lines[3], "");
    }

    #[test]
    fn startup_frame_waits_for_printer() {
        let lines = render("Printer", &DisplayFrame::default(), noon());
        assert_eq!(lines[1], "Offline");
        assert_eq!(lines[3], WAITING_TEXT);
    }

    #[test]
    fn long_names_are_cut_to_display_width() {
        let frame = DisplayFrame {
            phase: JobPhase::Idle,
            seconds_remaining: None,
            staleness: Staleness::Fresh,
        };
        let lines = render("A very long printer name indeed", &frame, noon());
        assert_eq!(lines[0].chars().count(), DISPLAY_COLUMNS);
    }
}
