use std::sync::Arc;

use crate::background::stream::StreamController;
use crate::config::ServerConfig;
use crate::simulator::Simulator;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Single owner of the dashboard state.
    pub simulator: Arc<Simulator>,
    /// Start/stop control for the telemetry stream.
    pub stream: Arc<StreamController>,
    /// WebSocket connection manager (dashboard clients).
    pub ws_manager: Arc<WsManager>,
    /// Event bus every state change is published on.
    pub event_bus: Arc<sensorhub_events::EventBus>,
}

impl AppState {
    /// Assemble the state around an already built simulator.
    ///
    /// The event bus is shared with the simulator and the stream controller
    /// ticks at the configured interval.
    pub fn new(config: ServerConfig, simulator: Simulator) -> Self {
        let simulator = Arc::new(simulator);
        let event_bus = Arc::clone(simulator.event_bus());
        let stream = Arc::new(StreamController::new(
            Arc::clone(&simulator),
            config.tick_interval(),
        ));

        Self {
            config: Arc::new(config),
            simulator,
            stream,
            ws_manager: Arc::new(WsManager::new()),
            event_bus,
        }
    }
}
