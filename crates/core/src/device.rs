//! Simulated device registry.
//!
//! Devices are kept in insertion order. Removal always pops the most recently
//! added device, which mirrors the "remove device" control of the dashboard.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::types::{LatencyMs, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix shared by every generated device identifier.
pub const DEVICE_ID_PREFIX: &str = "dev-";

/// Number of random base-36 characters following the prefix.
pub const DEVICE_ID_SUFFIX_LEN: usize = 7;

/// Upper bound (inclusive) of the latency assigned to a new device.
pub const MAX_INITIAL_LATENCY_MS: LatencyMs = 200;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// Connection status of a simulated device.
///
/// The simulation only ever produces `Online`; `Offline` exists so the
/// serialized shape matches what a dashboard expects to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Online => f.write_str("online"),
            DeviceStatus::Offline => f.write_str("offline"),
        }
    }
}

/// A single simulated device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    /// Generated identifier, e.g. `dev-k3x9a0q`.
    pub id: String,
    /// Display name, e.g. `Sensor 2`.
    pub name: String,
    pub status: DeviceStatus,
    /// When the device last produced a reading (or was created).
    pub last_seen: Timestamp,
    pub latency_ms: LatencyMs,
}

impl Device {
    /// Record a fresh sample for this device.
    pub fn touch(&mut self, now: Timestamp, latency_ms: LatencyMs) {
        self.last_seen = now;
        self.latency_ms = latency_ms;
    }
}

// ---------------------------------------------------------------------------
// DeviceRegistry
// ---------------------------------------------------------------------------

/// Ordered collection of simulated devices.
#[derive(Debug, Default, Clone)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new device and append it to the registry.
    ///
    /// The display name is `Sensor N` where `N` is the registry length after
    /// insertion. Identifiers are regenerated until they do not collide with
    /// an existing device.
    pub fn add_device<R: Rng + ?Sized>(&mut self, rng: &mut R, now: Timestamp) -> &Device {
        let mut id = generate_device_id(rng);
        while self.get(&id).is_some() {
            id = generate_device_id(rng);
        }

        let device = Device {
            id,
            name: format!("Sensor {}", self.devices.len() + 1),
            status: DeviceStatus::Online,
            last_seen: now,
            latency_ms: rng.random_range(0..=MAX_INITIAL_LATENCY_MS),
        };
        self.devices.push(device);
        &self.devices[self.devices.len() - 1]
    }

    /// Remove the most recently added device. Returns `None` when empty.
    pub fn remove_device(&mut self) -> Option<Device> {
        self.devices.pop()
    }

    /// Look up a device by identifier.
    pub fn get(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Pick a device uniformly at random for mutation.
    pub fn pick_random_mut<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&mut Device> {
        if self.devices.is_empty() {
            return None;
        }
        let idx = rng.random_range(0..self.devices.len());
        self.devices.get_mut(idx)
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Arithmetic mean of all device latencies, rounded to the nearest
    /// millisecond. Returns 0 for an empty registry.
    pub fn average_latency(&self) -> LatencyMs {
        if self.devices.is_empty() {
            return 0;
        }
        let total: u64 = self.devices.iter().map(|d| u64::from(d.latency_ms)).sum();
        (total as f64 / self.devices.len() as f64).round() as LatencyMs
    }
}

/// Generate a `dev-` identifier with a random base-36 suffix.
pub fn generate_device_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..DEVICE_ID_SUFFIX_LEN)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect();
    format!("{DEVICE_ID_PREFIX}{suffix}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
