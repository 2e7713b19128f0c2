use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use monitor_logging::{monitor_debug, monitor_error, monitor_info, monitor_warn, set_poll_cycle};
use remaining_time_core::{update, DisplayFrame, MonitorState};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::{
    ConfigError, FetchError, JobClient, PollSettings, PrinterConfig, ReqwestJobClient, StatusPoller,
};

#[derive(Debug, Error)]
pub enum StartError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client error: {0}")]
    Client(#[from] FetchError),
}

/// Background poll loop publishing one [`DisplayFrame`] per refresh.
///
/// Frames are sent whole over a channel; the receiving side never observes a
/// partially updated frame.
pub struct MonitorHandle {
    frame_rx: mpsc::Receiver<DisplayFrame>,
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl MonitorHandle {
    /// Validates the config and starts polling the configured printer.
    pub fn start(config: &PrinterConfig) -> Result<Self, StartError> {
        config.validate()?;
        let client = ReqwestJobClient::new(config)?;
        monitor_info!(
            "monitoring {} at {} every {:?}",
            config.server_name,
            client.url(),
            config.poll.cadence()
        );
        Ok(Self::with_client(client, config.poll.clone()))
    }

    pub fn with_client<C: JobClient + 'static>(client: C, settings: PollSettings) -> Self {
        let (frame_tx, frame_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();

        let worker = thread::Builder::new()
            .name("printer-monitor".into())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(err) => {
                        monitor_error!("could not start monitor runtime: {}", err);
                        return;
                    }
                };
                let poller = StatusPoller::new(client, &settings);
                runtime.block_on(run_monitor(poller, settings, frame_tx, loop_cancel));
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                monitor_error!("could not spawn monitor thread: {}", err);
                None
            }
        };

        Self {
            frame_rx,
            cancel,
            worker,
        }
    }

    pub fn try_recv(&self) -> Option<DisplayFrame> {
        self.frame_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<DisplayFrame> {
        self.frame_rx.recv_timeout(timeout).ok()
    }

    /// Newest queued frame, discarding older ones.
    pub fn latest(&self) -> Option<DisplayFrame> {
        self.frame_rx.try_iter().last()
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    pub fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_monitor<C: JobClient>(
    mut poller: StatusPoller<C>,
    settings: PollSettings,
    frame_tx: mpsc::Sender<DisplayFrame>,
    cancel: CancellationToken,
) {
    let cadence = settings.cadence();
    let refresh = settings.refresh();
    let mut state = MonitorState::new();
    let mut cycle: u64 = 0;

    loop {
        cycle += 1;
        set_poll_cycle(cycle);
        let started = Instant::now();

        let outcome = tokio::select! {
            _ = cancel.cancelled() => break,
            outcome = poller.poll(started) => outcome,
        };
        state = update(state, &outcome);
        monitor_debug!("phase {:?}, connection {:?}", state.phase(), poller.connection());

        if frame_tx.send(state.frame(Instant::now(), cadence)).is_err() {
            monitor_info!("display receiver dropped, stopping monitor");
            break;
        }

        let delay = poller.next_delay();
        let due = next_due(started, delay, Instant::now());

        // Republish between polls so the countdown and staleness keep moving.
        loop {
            let now = Instant::now();
            if now >= due {
                break;
            }
            let wake = (now + refresh).min(due);
            tokio::select! {
                _ = cancel.cancelled() => {
                    monitor_info!("monitor stopped");
                    return;
                }
                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(wake)) => {}
            }
            if wake < due && frame_tx.send(state.frame(Instant::now(), cadence)).is_err() {
                return;
            }
        }
    }
    monitor_info!("monitor stopped");
}

/// Next poll time. Slots that passed while a request was outstanding are
/// skipped rather than queued.
fn next_due(started: Instant, delay: Duration, now: Instant) -> Instant {
    let due = started + delay;
    if due > now || delay.is_zero() {
        return due;
    }
    let overrun = now.duration_since(due);
    let skipped = (overrun.as_nanos() / delay.as_nanos()) as u32 + 1;
    monitor_warn!("poll overran its slot, skipping {} cycle(s)", skipped);
    due + delay.saturating_mul(skipped)
}
