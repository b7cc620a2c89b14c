//! SensorHub API server library.
//!
//! Exposes the building blocks (config, state, simulator, stream control,
//! routes, WebSocket infrastructure) so integration tests and the binary
//! entrypoint can both access them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod response;
pub mod router;
pub mod routes;
pub mod simulator;
pub mod state;
pub mod ws;
