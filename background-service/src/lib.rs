//! Periodic trend re-scan running beside the interactive tools.

use chrono::{DateTime, Utc};
use content_engine::Studio;
use socialarch_core::{CoreError, Outcome, Settings, TrendCategory, TrendItem};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

const REPORT_BUFFER: usize = 16;

/// Longest accepted gap between scans; larger values are clamped to it.
pub const MAX_POLLING_INTERVAL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// What the monitor scans. Changes take effect on the next tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorTarget {
    pub settings: Settings,
    pub category: TrendCategory,
}

impl MonitorTarget {
    pub fn new(settings: Settings, category: TrendCategory) -> Self {
        Self { settings, category }
    }
}

#[derive(Debug)]
pub struct TrendReport {
    pub category: TrendCategory,
    pub outcome: Outcome<Vec<TrendItem>>,
    pub scanned_at: DateTime<Utc>,
}

pub struct TrendMonitor {
    studio: Arc<Studio>,
    polling_interval: Duration,
}

impl TrendMonitor {
    pub fn new(studio: Arc<Studio>, polling_interval_minutes: u64) -> Self {
        Self::with_interval(studio, Duration::from_secs(polling_interval_minutes.saturating_mul(60)))
    }

    pub fn polling_interval(&self) -> Duration {
        self.polling_interval
    }

    pub fn with_interval(studio: Arc<Studio>, polling_interval: Duration) -> Self {
        Self {
            studio,
            polling_interval: polling_interval.clamp(Duration::from_millis(1), MAX_POLLING_INTERVAL),
        }
    }

    /// Starts polling on a tokio task. The first scan runs one interval after
    /// the call; a tick that arrives while a scan is still running is skipped.
    pub fn spawn(self, target: MonitorTarget) -> (MonitorHandle, mpsc::Receiver<TrendReport>) {
        let (target_tx, target_rx) = watch::channel(target);
        let (report_tx, report_rx) = mpsc::channel(REPORT_BUFFER);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        info!(
            "Starting trend monitor every {:?}",
            self.polling_interval
        );
        let task = tokio::spawn(self.run(target_rx, report_tx, shutdown_rx));

        let handle = MonitorHandle {
            target: target_tx,
            shutdown: shutdown_tx,
            task,
        };
        (handle, report_rx)
    }

    async fn run(
        self,
        target: watch::Receiver<MonitorTarget>,
        reports: mpsc::Sender<TrendReport>,
        mut shutdown: oneshot::Receiver<()>,
    ) {
        let period = self.polling_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
            }

            let MonitorTarget { settings, category } = target.borrow().clone();
            debug!("Monitor tick: scanning {} trends", category);

            let outcome = tokio::select! {
                _ = &mut shutdown => {
                    debug!("Monitor stopped during a scan");
                    break;
                }
                outcome = self.studio.scan_trends(&settings, category) => outcome,
            };

            if outcome.is_degraded() {
                warn!("Scheduled {} scan degraded", category);
            }

            let report = TrendReport {
                category,
                outcome,
                scanned_at: Utc::now(),
            };
            tokio::select! {
                _ = &mut shutdown => {
                    debug!("Monitor stopped while the report queue was full");
                    break;
                }
                sent = reports.send(report) => {
                    if sent.is_err() {
                        debug!("Report receiver dropped, stopping monitor");
                        break;
                    }
                }
            }
        }

        info!("Trend monitor stopped");
    }
}

/// Control side of a running monitor. Dropping it also stops the task.
pub struct MonitorHandle {
    target: watch::Sender<MonitorTarget>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl MonitorHandle {
    pub fn retarget(&self, target: MonitorTarget) {
        self.target.send_replace(target);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Signals shutdown, abandoning any in-flight scan, and waits for the task.
    pub async fn stop(self) -> Result<(), CoreError> {
        let _ = self.shutdown.send(());
        self.task.await.map_err(|e| CoreError::Internal {
            message: format!("trend monitor task failed: {e}"),
        })
    }
}
