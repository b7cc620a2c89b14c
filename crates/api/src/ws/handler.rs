use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager`, sent a
/// full dashboard snapshot, and then receives every published event.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with `WsManager`.
///   2. Sends the current snapshot, stamped with a `seq`, directly on the sink.
///   3. Spawns a sender task that forwards messages from the manager channel.
///   4. Drains inbound messages on the current task until close.
///
/// An event published shortly before registration can still be relayed
/// after it, although the snapshot already reflects it. Such events carry a
/// `seq` no greater than the snapshot's; clients drop them.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let ws_manager = state.ws_manager;
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    // Register first so no event published after the snapshot is missed.
    let mut rx = ws_manager.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    let snapshot = state.simulator.sequenced_snapshot().await;
    match snapshot.to_json() {
        Ok(json) => {
            if sink.send(Message::Text(json.into())).await.is_err() {
                tracing::debug!(conn_id = %conn_id, "WebSocket closed before snapshot");
                ws_manager.remove(&conn_id).await;
                return;
            }
        }
        Err(e) => {
            tracing::error!(conn_id = %conn_id, error = %e, "Failed to serialize snapshot");
        }
    }

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: the dashboard is driven over HTTP, so inbound frames
    // only matter for liveness.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {
                tracing::trace!(conn_id = %conn_id, "Ignoring inbound WebSocket message");
            }
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let connected_secs = ws_manager
        .connected_at(&conn_id)
        .await
        .map(|at| (chrono::Utc::now() - at).num_seconds());
    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, ?connected_secs, "WebSocket disconnected");
}
