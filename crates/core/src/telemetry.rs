//! Fabricated telemetry readings.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::types::{LatencyMs, Timestamp};

/// Lowest temperature a reading can carry, in °C.
pub const MIN_TEMPERATURE_C: f64 = 20.0;

/// Exclusive upper bound of a reading's temperature, in °C.
pub const MAX_TEMPERATURE_C: f64 = 40.0;

/// Largest latency change applied per tick, in either direction.
pub const LATENCY_WALK_STEP_MS: f64 = 20.0;

/// Latency never drops below this after a walk.
pub const MIN_LATENCY_MS: LatencyMs = 1;

/// One synthesized sample. Never stored beyond the log line and sparkline
/// point derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryReading {
    pub device_id: String,
    pub timestamp: Timestamp,
    /// Rounded to two decimals, in `[20.00, 40.00)`.
    pub temperature: f64,
    /// Device latency at the moment of sampling, before the walk.
    pub latency_ms: LatencyMs,
}

impl TelemetryReading {
    /// Format the reading as a telemetry log line.
    pub fn log_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TelemetryReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | temp={:.2}°C | lat={}ms",
            self.timestamp.format("%H:%M:%S"),
            self.device_id,
            self.temperature,
            self.latency_ms
        )
    }
}

/// Sample a temperature in `[20.00, 40.00)` with two-decimal precision.
///
/// Drawn as whole hundredths so rounding can never push the value onto the
/// exclusive upper bound.
pub fn sample_temperature<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let lo = (MIN_TEMPERATURE_C * 100.0) as u32;
    let hi = (MAX_TEMPERATURE_C * 100.0) as u32;
    f64::from(rng.random_range(lo..hi)) / 100.0
}

/// Apply one bounded random-walk step to a latency value.
///
/// The result is `previous ± up to 20`, rounded, and floored at
/// [`MIN_LATENCY_MS`].
pub fn walk_latency<R: Rng + ?Sized>(previous: LatencyMs, rng: &mut R) -> LatencyMs {
    let delta = rng.random::<f64>() * (2.0 * LATENCY_WALK_STEP_MS) - LATENCY_WALK_STEP_MS;
    let next = (f64::from(previous) + delta).round();
    next.max(f64::from(MIN_LATENCY_MS)) as LatencyMs
}
