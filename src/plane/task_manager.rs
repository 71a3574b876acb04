use log::{debug, error, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::PlaneConfig;

/// Cadence of the packet simulation loop.
#[derive(Debug, Clone, Copy)]
pub struct WorkerSettings {
    interval: Duration,
    packet_increment: u64,
    report_every: u64,
}

impl WorkerSettings {
    /// `report_every` of zero is treated as one.
    pub fn new(interval: Duration, packet_increment: u64, report_every: u64) -> Self {
        Self {
            interval,
            packet_increment,
            report_every: report_every.max(1),
        }
    }
}

impl From<&PlaneConfig> for WorkerSettings {
    fn from(config: &PlaneConfig) -> Self {
        Self::new(
            config.worker_interval(),
            config.packet_increment,
            config.report_every(),
        )
    }
}

/// Adds `increment` without ever wrapping, returning the new total.
fn bump_packets(counter: &AtomicU64, increment: u64) -> u64 {
    let previous = counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| {
            Some(v.saturating_add(increment))
        })
        .unwrap_or_else(|v| v);
    previous.saturating_add(increment)
}

fn should_report(iteration: u64, report_every: u64) -> bool {
    iteration % report_every.max(1) == 0
}

/// A running worker: the stop signal and the handle to join on.
pub struct Worker {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl Worker {
    pub fn spawn(settings: WorkerSettings, packets_processed: Arc<AtomicU64>) -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            worker_task(settings, packets_processed, stop_rx).await;
        });

        Self { stop_tx, handle }
    }

    /// Signals the loop and waits until the task has exited.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);

        if let Err(e) = self.handle.await {
            if e.is_panic() {
                error!("Data plane worker panicked: {}", e);
            } else {
                debug!("Data plane worker cancelled: {}", e);
            }
        }
    }

    /// Best-effort stop for contexts that cannot await.
    pub fn abort(self) {
        let _ = self.stop_tx.send(true);
        self.handle.abort();
    }
}

async fn worker_task(
    settings: WorkerSettings,
    packets_processed: Arc<AtomicU64>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut iteration: u64 = 0;

    loop {
        tokio::select! {
            // Fires on the stop signal and when the sender is dropped.
            _ = stop_rx.changed() => {
                break;
            }
            _ = tokio::time::sleep(settings.interval) => {
                let total = bump_packets(&packets_processed, settings.packet_increment);

                if should_report(iteration, settings.report_every) {
                    info!("Data plane processing packets... ({} total)", total);
                }
                iteration = iteration.wrapping_add(1);
            }
        }
    }

    debug!("Data plane worker shutting down after {} iterations", iteration);
}
