//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`DashboardEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.
//!
//! Every published event is stamped with a sequence number, starting at 1 and
//! increasing by one per event in delivery order.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::broadcast;

use sensorhub_core::dashboard::{DashboardSnapshot, Metrics, TickOutcome};
use sensorhub_core::device::Device;
use sensorhub_core::log::LogEntry;
use sensorhub_core::rule::{Rule, RuleAlert};
use sensorhub_core::telemetry::TelemetryReading;

// ---------------------------------------------------------------------------
// DashboardEvent
// ---------------------------------------------------------------------------

/// A state change on the dashboard.
///
/// Serialized with a `type` tag so clients can dispatch on it, e.g.
/// `{"type": "device_added", "device": {...}, "metrics": {...}}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// Full state, sent to a client right after it connects.
    Snapshot(DashboardSnapshot),

    DeviceAdded {
        device: Device,
        metrics: Metrics,
    },

    DeviceRemoved {
        device: Device,
        metrics: Metrics,
    },

    DevicePinged {
        entry: LogEntry,
    },

    /// One telemetry tick, including any alerts it fired.
    Telemetry {
        reading: TelemetryReading,
        device: Device,
        alerts: Vec<RuleAlert>,
        log_line: String,
        metrics: Metrics,
    },

    RuleTriggered {
        alert: RuleAlert,
        message: String,
    },

    RulesChanged {
        rules: Vec<Rule>,
    },

    LogCleared,

    StreamStateChanged {
        running: bool,
    },
}

impl DashboardEvent {
    /// Stable name of the event, matching the serialized `type` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::Snapshot(_) => "snapshot",
            DashboardEvent::DeviceAdded { .. } => "device_added",
            DashboardEvent::DeviceRemoved { .. } => "device_removed",
            DashboardEvent::DevicePinged { .. } => "device_pinged",
            DashboardEvent::Telemetry { .. } => "telemetry",
            DashboardEvent::RuleTriggered { .. } => "rule_triggered",
            DashboardEvent::RulesChanged { .. } => "rules_changed",
            DashboardEvent::LogCleared => "log_cleared",
            DashboardEvent::StreamStateChanged { .. } => "stream_state_changed",
        }
    }

    /// Build the `telemetry` event for a completed tick.
    pub fn telemetry(outcome: TickOutcome, metrics: Metrics) -> Self {
        let TickOutcome {
            reading,
            device,
            alerts,
        } = outcome;
        DashboardEvent::Telemetry {
            log_line: reading.log_line(),
            reading,
            device,
            alerts,
            metrics,
        }
    }

    /// Build the `rule_triggered` event for an alert.
    pub fn rule_triggered(alert: RuleAlert) -> Self {
        let message = alert.to_string();
        DashboardEvent::RuleTriggered { alert, message }
    }

    /// Serialize the event as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// SequencedEvent
// ---------------------------------------------------------------------------

/// A [`DashboardEvent`] together with its position in the bus's stream.
///
/// Serialized flat: `{"seq": 7, "type": "telemetry", ...}`. A snapshot
/// stamped with `seq = n` already reflects every event with `seq <= n`, so
/// a client that receives one drops any later event with `seq <= n`.
#[derive(Debug, Clone, Serialize)]
pub struct SequencedEvent {
    pub seq: u64,
    #[serde(flatten)]
    pub event: DashboardEvent,
}

impl SequencedEvent {
    pub fn event_type(&self) -> &'static str {
        self.event.event_type()
    }

    /// Serialize the event as a JSON string for the WebSocket wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`DashboardEvent`], stamped as a
/// [`SequencedEvent`].
///
/// # Usage
///
/// ```rust
/// use sensorhub_events::bus::{DashboardEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DashboardEvent::LogCleared);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<SequencedEvent>,
    /// Sequence number of the last published event. Held while sending so
    /// numbers follow channel order.
    last_seq: Mutex<u64>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            last_seq: Mutex::new(0),
        }
    }

    /// Publish an event to all current subscribers and return its sequence
    /// number.
    ///
    /// If there are no active subscribers the event is silently dropped; it
    /// still consumes a sequence number.
    pub fn publish(&self, event: DashboardEvent) -> u64 {
        let mut last_seq = self.last_seq.lock().unwrap_or_else(PoisonError::into_inner);
        *last_seq += 1;
        let seq = *last_seq;
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(SequencedEvent { seq, event });
        seq
    }

    /// Sequence number of the most recently published event, 0 if none.
    pub fn last_seq(&self) -> u64 {
        *self.last_seq.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<SequencedEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
