//! Event-to-WebSocket relay.
//!
//! [`EventRelay`] subscribes to the dashboard event bus and forwards every
//! event, serialized as JSON, to all connected WebSocket clients.

use std::sync::Arc;

use axum::extract::ws::Message;
use sensorhub_events::SequencedEvent;
use tokio::sync::broadcast;

use crate::ws::WsManager;

pub struct EventRelay {
    ws_manager: Arc<WsManager>,
}

impl EventRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the relay loop.
    ///
    /// The loop exits when the channel is closed (i.e. the
    /// [`EventBus`](sensorhub_events::EventBus) is dropped).
    pub async fn run(self, mut receiver: broadcast::Receiver<SequencedEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(&event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, event relay shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: &SequencedEvent) {
        match event.to_json() {
            Ok(json) => {
                self.ws_manager
                    .broadcast(Message::Text(json.into()))
                    .await;
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    event_type = event.event_type(),
                    "Failed to serialize event"
                );
            }
        }
    }
}
