//! SensorHub simulation core.
//!
//! Pure, synchronous domain logic for the simulated device dashboard:
//! device registry, threshold rules, telemetry readings, the telemetry log
//! and the sparkline buffer. Nothing in this crate touches the network or a
//! clock directly; randomness and timestamps are injected by the caller so
//! every operation is deterministic under test.

pub mod dashboard;
pub mod device;
pub mod error;
pub mod log;
pub mod rule;
pub mod sparkline;
pub mod telemetry;
pub mod types;
