//! End-to-end tests for the `/api/v1/ws` event stream over a real socket.

mod common;

use std::net::SocketAddr;
use std::sync::Arc;

use common::{build_test_app, test_state};
use futures::StreamExt;
use sensorhub_api::relay::EventRelay;
use sensorhub_api::state::AppState;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serve the full router on an ephemeral port with the event relay running.
async fn spawn_server(state: AppState) -> SocketAddr {
    let relay = EventRelay::new(Arc::clone(&state.ws_manager));
    tokio::spawn(relay.run(state.event_bus.subscribe()));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_test_app(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> Client {
    let (client, _) = connect_async(format!("ws://{addr}/api/v1/ws"))
        .await
        .expect("WebSocket handshake should succeed");
    client
}

/// Next text frame as JSON, skipping control frames.
async fn next_json(client: &mut Client) -> Value {
    loop {
        match client.next().await.expect("stream ended").unwrap() {
            Message::Text(text) => return serde_json::from_str(&text).unwrap(),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Test: the first frame is a snapshot of the seeded dashboard
// ---------------------------------------------------------------------------

#[tokio::test]
async fn first_frame_is_snapshot_with_seeded_devices() {
    let state = test_state(3);
    let expected: Vec<String> = state
        .simulator
        .devices()
        .await
        .devices
        .into_iter()
        .map(|d| d.id)
        .collect();

    let addr = spawn_server(state).await;
    let mut client = connect(addr).await;

    let json = next_json(&mut client).await;
    assert_eq!(json["type"], "snapshot");
    assert_eq!(json["seq"], 0);

    let ids: Vec<&str> = json["devices"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(json["metrics"]["active_devices"], 3);
    assert_eq!(json["sparkline"]["points"], serde_json::json!([0.0]));
}

// ---------------------------------------------------------------------------
// Test: events after the snapshot arrive with a higher seq
// ---------------------------------------------------------------------------

#[tokio::test]
async fn later_events_follow_snapshot_in_sequence() {
    let state = test_state(1);
    let addr = spawn_server(state.clone()).await;

    // Published before the client connects; already part of the snapshot.
    state.simulator.clear_log().await;

    let mut client = connect(addr).await;
    let snapshot = next_json(&mut client).await;
    assert_eq!(snapshot["type"], "snapshot");
    let snapshot_seq = snapshot["seq"].as_u64().unwrap();
    assert_eq!(snapshot_seq, 1);

    let added = state.simulator.add_device().await;

    // The relay may still deliver the pre-connect event; it is stale.
    let event = loop {
        let event = next_json(&mut client).await;
        if event["seq"].as_u64().unwrap() > snapshot_seq {
            break event;
        }
        assert_eq!(event["type"], "log_cleared");
    };
    assert_eq!(event["type"], "device_added");
    assert_eq!(event["device"]["id"], added.id.as_str());
    assert_eq!(event["metrics"]["active_devices"], 2);
    assert_eq!(event["seq"].as_u64().unwrap(), snapshot_seq + 1);
}
