//! Dashboard aggregate: everything a single simulation owns.
//!
//! [`Dashboard`] ties the registry, rules, log and sparkline together and
//! implements the per-tick telemetry pipeline. It is the single writer of
//! all simulation state; the caller decides how to share it.

use rand::Rng;
use serde::Serialize;

use crate::device::{Device, DeviceRegistry};
use crate::error::CoreError;
use crate::log::{LogEntry, LogKind, TelemetryLog, DEFAULT_LOG_CAPACITY};
use crate::rule::{Rule, RuleAlert, RuleSet};
use crate::sparkline::{Sparkline, SparklineSnapshot};
use crate::telemetry::{sample_temperature, walk_latency, TelemetryReading};
use crate::types::{LatencyMs, Timestamp};

/// Number of devices created when a dashboard starts.
pub const DEFAULT_SEED_DEVICES: usize = 3;

/// Headline figures derived from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub active_devices: usize,
    pub avg_latency_ms: LatencyMs,
}

/// Everything that happened during one telemetry tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickOutcome {
    pub reading: TelemetryReading,
    /// The sampled device after its latency and last-seen were updated.
    pub device: Device,
    pub alerts: Vec<RuleAlert>,
}

/// Full view of the dashboard for a freshly connected client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub devices: Vec<Device>,
    pub metrics: Metrics,
    pub rules: Vec<Rule>,
    pub log: Vec<LogEntry>,
    pub sparkline: SparklineSnapshot,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    registry: DeviceRegistry,
    rules: RuleSet,
    log: TelemetryLog,
    sparkline: Sparkline,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl Dashboard {
    /// An empty dashboard: no devices, no rules, empty log and sparkline.
    pub fn new(log_capacity: usize) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            rules: RuleSet::new(),
            log: TelemetryLog::with_capacity(log_capacity),
            sparkline: Sparkline::new(),
        }
    }

    /// A dashboard with `devices` pre-created and a baseline `0.0` point on
    /// the sparkline.
    pub fn seeded<R: Rng + ?Sized>(
        rng: &mut R,
        now: Timestamp,
        devices: usize,
        log_capacity: usize,
    ) -> Self {
        let mut dashboard = Self::new(log_capacity);
        for _ in 0..devices {
            dashboard.registry.add_device(rng, now);
        }
        dashboard.sparkline.push(0.0);
        dashboard
    }

    // -- Devices ------------------------------------------------------------

    pub fn add_device<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Timestamp) -> Device {
        self.registry.add_device(rng, now).clone()
    }

    pub fn remove_device(&mut self) -> Option<Device> {
        self.registry.remove_device()
    }

    /// Log a ping against an existing device.
    pub fn ping_device(&mut self, id: &str, now: Timestamp) -> Result<LogEntry, CoreError> {
        if self.registry.get(id).is_none() {
            return Err(CoreError::NotFound {
                entity: "Device",
                id: id.to_string(),
            });
        }
        Ok(self.log.push(LogKind::Ping, format!("Pinged {id}"), now).clone())
    }

    // -- Rules --------------------------------------------------------------

    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.add(rule);
    }

    pub fn remove_rule(&mut self, index: usize) -> Option<Rule> {
        self.rules.remove(index)
    }

    // -- Log ----------------------------------------------------------------

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    // -- Telemetry ----------------------------------------------------------

    /// Run one telemetry tick.
    ///
    /// Returns `None` without touching any state when there are no devices.
    /// Otherwise one device is sampled, its latency walks and its last-seen
    /// moves to `now`; the reading lands in the log and sparkline and is
    /// evaluated against every rule. Fired alerts are logged after the
    /// reading.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Timestamp) -> Option<TickOutcome> {
        let device = self.registry.pick_random_mut(rng)?;

        let reading = TelemetryReading {
            device_id: device.id.clone(),
            timestamp: now,
            temperature: sample_temperature(rng),
            latency_ms: device.latency_ms,
        };
        let latency = walk_latency(device.latency_ms, rng);
        device.touch(now, latency);
        let device = device.clone();

        self.log.push(LogKind::Telemetry, reading.log_line(), now);
        self.sparkline.push(reading.temperature);

        let alerts = self.rules.evaluate(&reading);
        for alert in &alerts {
            self.log.push(LogKind::Alert, alert.to_string(), now);
        }

        Some(TickOutcome {
            reading,
            device,
            alerts,
        })
    }

    // -- Views --------------------------------------------------------------

    pub fn metrics(&self) -> Metrics {
        Metrics {
            active_devices: self.registry.len(),
            avg_latency_ms: self.registry.average_latency(),
        }
    }

    pub fn devices(&self) -> &[Device] {
        self.registry.devices()
    }

    pub fn rules(&self) -> &[Rule] {
        self.rules.rules()
    }

    pub fn log(&self) -> &TelemetryLog {
        &self.log
    }

    pub fn sparkline(&self) -> &Sparkline {
        &self.sparkline
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            devices: self.registry.devices().to_vec(),
            metrics: self.metrics(),
            rules: self.rules.rules().to_vec(),
            log: self.log.entries().cloned().collect(),
            sparkline: self.sparkline.snapshot(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
