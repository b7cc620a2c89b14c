//! Integration tests for the WebSocket connection manager and event relay.

use std::sync::Arc;

use axum::extract::ws::Message;
use sensorhub_api::relay::EventRelay;
use sensorhub_api::ws::manager::WsManager;
use sensorhub_events::{DashboardEvent, EventBus};

// ---------------------------------------------------------------------------
// Test: add and remove connections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_and_remove_connections() {
    let manager = WsManager::new();

    let _rx1 = manager.add("conn-1".to_string()).await;
    let _rx2 = manager.add("conn-2".to_string()).await;
    assert_eq!(manager.connection_count().await, 2);
    assert!(manager.connected_at("conn-1").await.is_some());

    manager.remove("conn-1").await;
    assert_eq!(manager.connection_count().await, 1);
    assert!(manager.connected_at("conn-1").await.is_none());
}

// ---------------------------------------------------------------------------
// Test: broadcast reaches every connection
// ---------------------------------------------------------------------------

#[tokio::test]
async fn broadcast_reaches_all_connections() {
    let manager = WsManager::new();
    let mut rx1 = manager.add("a".to_string()).await;
    let mut rx2 = manager.add("b".to_string()).await;

    manager.broadcast(Message::Text("hello".into())).await;

    for rx in [&mut rx1, &mut rx2] {
        match rx.recv().await.unwrap() {
            Message::Text(text) => assert_eq!(text.as_str(), "hello"),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}

#[tokio::test]
async fn broadcast_skips_closed_receivers() {
    let manager = WsManager::new();
    let rx1 = manager.add("gone".to_string()).await;
    let mut rx2 = manager.add("alive".to_string()).await;
    drop(rx1);

    manager.broadcast(Message::Text("still here".into())).await;
    assert!(matches!(rx2.recv().await, Some(Message::Text(_))));
}

// ---------------------------------------------------------------------------
// Test: shutdown sends Close and clears the map
// ---------------------------------------------------------------------------

#[tokio::test]
async fn shutdown_all_sends_close_frames() {
    let manager = WsManager::new();
    let mut rx = manager.add("x".to_string()).await;

    manager.shutdown_all().await;

    assert!(matches!(rx.recv().await, Some(Message::Close(None))));
    assert_eq!(manager.connection_count().await, 0);
}

// ---------------------------------------------------------------------------
// Test: relay forwards bus events as tagged JSON text frames
// ---------------------------------------------------------------------------

#[tokio::test]
async fn relay_forwards_events_as_json() {
    let manager = Arc::new(WsManager::new());
    let bus = EventBus::default();
    let mut client = manager.add("client".to_string()).await;

    let relay = EventRelay::new(Arc::clone(&manager));
    let handle = tokio::spawn(relay.run(bus.subscribe()));

    bus.publish(DashboardEvent::StreamStateChanged { running: true });

    match client.recv().await.unwrap() {
        Message::Text(text) => {
            let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            assert_eq!(json["seq"], 1);
            assert_eq!(json["type"], "stream_state_changed");
            assert_eq!(json["running"], true);
        }
        other => panic!("unexpected message: {other:?}"),
    }

    drop(bus);
    handle.await.unwrap();
}
