//! Shared owner of the dashboard state.
//!
//! [`Simulator`] wraps the core [`Dashboard`] behind a single async mutex so
//! HTTP handlers and the telemetry stream task mutate it one at a time. Every
//! mutation is announced on the [`EventBus`] before the lock is released, so
//! a snapshot taken under the same lock lines up with the bus sequence.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sensorhub_core::dashboard::{Dashboard, DashboardSnapshot, Metrics, TickOutcome};
use sensorhub_core::device::Device;
use sensorhub_core::error::CoreError;
use sensorhub_core::log::LogEntry;
use sensorhub_core::rule::Rule;
use sensorhub_core::sparkline::SparklineSnapshot;
use sensorhub_events::{DashboardEvent, EventBus, SequencedEvent};
use tokio::sync::Mutex;

struct Inner {
    dashboard: Dashboard,
    rng: StdRng,
}

/// Devices plus the metrics derived from them.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeviceListing {
    pub devices: Vec<Device>,
    pub metrics: Metrics,
}

pub struct Simulator {
    inner: Mutex<Inner>,
    event_bus: Arc<EventBus>,
}

impl Simulator {
    /// Wrap an existing dashboard with a caller-supplied random source.
    pub fn with_rng(dashboard: Dashboard, rng: StdRng, event_bus: Arc<EventBus>) -> Self {
        Self {
            inner: Mutex::new(Inner { dashboard, rng }),
            event_bus,
        }
    }

    /// Build a seeded dashboard: `devices` pre-created devices and a
    /// baseline sparkline point.
    pub fn seeded(devices: usize, log_capacity: usize, event_bus: Arc<EventBus>) -> Self {
        let mut rng = StdRng::from_os_rng();
        let dashboard = Dashboard::seeded(&mut rng, Utc::now(), devices, log_capacity);
        Self::with_rng(dashboard, rng, event_bus)
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    // -- Views --------------------------------------------------------------

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.inner.lock().await.dashboard.snapshot()
    }

    /// A `snapshot` event stamped with the sequence number of the last event
    /// it already reflects.
    pub async fn sequenced_snapshot(&self) -> SequencedEvent {
        let inner = self.inner.lock().await;
        SequencedEvent {
            seq: self.event_bus.last_seq(),
            event: DashboardEvent::Snapshot(inner.dashboard.snapshot()),
        }
    }

    pub async fn devices(&self) -> DeviceListing {
        let inner = self.inner.lock().await;
        DeviceListing {
            devices: inner.dashboard.devices().to_vec(),
            metrics: inner.dashboard.metrics(),
        }
    }

    pub async fn metrics(&self) -> Metrics {
        self.inner.lock().await.dashboard.metrics()
    }

    pub async fn rules(&self) -> Vec<Rule> {
        self.inner.lock().await.dashboard.rules().to_vec()
    }

    pub async fn log(&self) -> Vec<LogEntry> {
        self.inner
            .lock()
            .await
            .dashboard
            .log()
            .entries()
            .cloned()
            .collect()
    }

    pub async fn sparkline(&self) -> SparklineSnapshot {
        self.inner.lock().await.dashboard.sparkline().snapshot()
    }

    // -- Commands -----------------------------------------------------------

    pub async fn add_device(&self) -> Device {
        let mut guard = self.inner.lock().await;
        let Inner { dashboard, rng } = &mut *guard;
        let device = dashboard.add_device(rng, Utc::now());

        tracing::info!(device_id = %device.id, name = %device.name, "Device added");
        self.event_bus.publish(DashboardEvent::DeviceAdded {
            device: device.clone(),
            metrics: dashboard.metrics(),
        });
        device
    }

    /// Remove the most recently added device; `None` when there are none.
    pub async fn remove_device(&self) -> Option<Device> {
        let mut guard = self.inner.lock().await;
        let removed = guard.dashboard.remove_device();

        match &removed {
            Some(device) => {
                tracing::info!(device_id = %device.id, "Device removed");
                self.event_bus.publish(DashboardEvent::DeviceRemoved {
                    device: device.clone(),
                    metrics: guard.dashboard.metrics(),
                });
            }
            None => tracing::debug!("Remove requested on empty registry"),
        }
        removed
    }

    pub async fn ping_device(&self, id: &str) -> Result<LogEntry, CoreError> {
        let mut guard = self.inner.lock().await;
        let entry = guard.dashboard.ping_device(id, Utc::now())?;

        tracing::debug!(device_id = %id, "Device pinged");
        self.event_bus.publish(DashboardEvent::DevicePinged {
            entry: entry.clone(),
        });
        Ok(entry)
    }

    pub async fn add_rule(&self, rule: Rule) -> Vec<Rule> {
        let mut guard = self.inner.lock().await;
        tracing::info!(
            name = %rule.name,
            condition = %rule.condition,
            threshold = rule.threshold,
            "Rule added",
        );
        guard.dashboard.add_rule(rule);

        let rules = guard.dashboard.rules().to_vec();
        self.event_bus.publish(DashboardEvent::RulesChanged {
            rules: rules.clone(),
        });
        rules
    }

    /// Delete the rule at `index`; `None` when the index is out of range.
    pub async fn remove_rule(&self, index: usize) -> Option<Rule> {
        let mut guard = self.inner.lock().await;
        let removed = guard.dashboard.remove_rule(index);

        if let Some(rule) = &removed {
            tracing::info!(index, name = %rule.name, "Rule deleted");
            self.event_bus.publish(DashboardEvent::RulesChanged {
                rules: guard.dashboard.rules().to_vec(),
            });
        }
        removed
    }

    pub async fn clear_log(&self) {
        let mut guard = self.inner.lock().await;
        guard.dashboard.clear_log();
        tracing::debug!("Telemetry log cleared");
        self.event_bus.publish(DashboardEvent::LogCleared);
    }

    /// Announce a telemetry stream state change in sequence with dashboard
    /// mutations.
    pub async fn publish_stream_state(&self, running: bool) {
        let _guard = self.inner.lock().await;
        self.event_bus
            .publish(DashboardEvent::StreamStateChanged { running });
    }

    /// Run one telemetry tick and publish its reading, then its alerts.
    ///
    /// Returns `None` when the registry is empty; nothing is published then.
    pub async fn tick(&self) -> Option<TickOutcome> {
        let mut guard = self.inner.lock().await;
        let Inner { dashboard, rng } = &mut *guard;
        let outcome = dashboard.tick(rng, Utc::now())?;

        tracing::debug!(
            device_id = %outcome.reading.device_id,
            temperature = outcome.reading.temperature,
            latency_ms = outcome.device.latency_ms,
            alerts = outcome.alerts.len(),
            "Telemetry tick",
        );

        self.event_bus
            .publish(DashboardEvent::telemetry(outcome.clone(), dashboard.metrics()));
        for alert in &outcome.alerts {
            tracing::info!(rule = %alert.rule_name, device_id = %alert.device_id, "Rule triggered");
            self.event_bus
                .publish(DashboardEvent::rule_triggered(alert.clone()));
        }

        Some(outcome)
    }
}
