//! Periodic telemetry stream.
//!
//! The stream is a two-state machine: stopped or running. Starting spawns a
//! task that ticks the [`Simulator`] once per period (the first tick lands
//! one full period after start); stopping cancels that task. Starting an
//! already running stream and stopping a stopped one are both no-ops.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::simulator::Simulator;

/// How long `stop` waits for the stream task to wind down.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Run the telemetry loop until `cancel` is triggered.
pub async fn run(simulator: Arc<Simulator>, period: Duration, cancel: CancellationToken) {
    tracing::info!(period_ms = period.as_millis() as u64, "Telemetry stream started");

    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Telemetry stream stopping");
                break;
            }
            _ = interval.tick() => {
                if simulator.tick().await.is_none() {
                    tracing::trace!("Telemetry tick skipped: no devices");
                }
            }
        }
    }
}

struct RunningStream {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Start/stop handle for the telemetry stream.
pub struct StreamController {
    simulator: Arc<Simulator>,
    period: Duration,
    running: Mutex<Option<RunningStream>>,
}

impl StreamController {
    pub fn new(simulator: Arc<Simulator>, period: Duration) -> Self {
        Self {
            simulator,
            period,
            running: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Start ticking. Returns `false` if the stream was already running.
    pub async fn start(&self) -> bool {
        {
            let mut running = self.running.lock().await;
            if running.is_some() {
                return false;
            }
            let cancel = CancellationToken::new();
            let handle = tokio::spawn(run(
                Arc::clone(&self.simulator),
                self.period,
                cancel.clone(),
            ));
            *running = Some(RunningStream { cancel, handle });
        }

        self.simulator.publish_stream_state(true).await;
        true
    }

    /// Cancel the pending timer. Returns `false` if the stream was stopped.
    pub async fn stop(&self) -> bool {
        let Some(stream) = self.running.lock().await.take() else {
            return false;
        };

        stream.cancel.cancel();
        if tokio::time::timeout(STOP_TIMEOUT, stream.handle)
            .await
            .is_err()
        {
            tracing::warn!("Telemetry stream did not stop within timeout");
        }

        self.simulator.publish_stream_state(false).await;
        true
    }
}
