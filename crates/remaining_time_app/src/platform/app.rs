use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use monitor_logging::{monitor_error, monitor_info};
use remaining_time_engine::{MonitorHandle, StartError};

use super::settings::{load_settings, DEFAULT_SETTINGS_PATH};
use super::{logging, ui};

const FRAME_WAIT: Duration = Duration::from_millis(500);

pub fn run_app() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    let settings = load_settings(&path)?;
    logging::initialize(&settings.logging);

    let printer = settings.printer;
    let mut monitor = match MonitorHandle::start(&printer) {
        Ok(monitor) => monitor,
        Err(StartError::Config(err)) => {
            monitor_error!("refusing to start: {}", err);
            return Err(err).with_context(|| format!("invalid settings in {}", path.display()));
        }
        Err(err) => return Err(err.into()),
    };

    let mut shown: Vec<String> = Vec::new();
    loop {
        let Some(frame) = monitor.recv_timeout(FRAME_WAIT) else {
            if !monitor.is_running() {
                monitor.stop();
                bail!("printer monitor stopped unexpectedly");
            }
            continue;
        };
        let frame = monitor.latest().unwrap_or(frame);
        let lines = ui::render::render(&printer.server_name, &frame, chrono::Local::now());
        if lines == shown {
            continue;
        }

        let mut out = std::io::stdout().lock();
        for line in &lines {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        out.flush()?;
        if shown.get(1) != lines.get(1) {
            monitor_info!("display shows {:?}", frame.phase);
        }
        shown = lines;
    }
}
