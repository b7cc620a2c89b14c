pub mod dashboard;
pub mod devices;
pub mod rules;
pub mod stream;
pub mod telemetry;
