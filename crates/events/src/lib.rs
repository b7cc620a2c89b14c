//! SensorHub event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`DashboardEvent`]: every state change the dashboard announces to
//!   connected clients.

pub mod bus;

pub use bus::{DashboardEvent, EventBus, SequencedEvent};
