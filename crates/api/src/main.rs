use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sensorhub_api::config::ServerConfig;
use sensorhub_api::relay::EventRelay;
use sensorhub_api::router::build_app_router;
use sensorhub_api::simulator::Simulator;
use sensorhub_api::state::AppState;
use sensorhub_api::ws;
use sensorhub_events::EventBus;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensorhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });
    tracing::info!(
        host = %config.host,
        port = config.port,
        tick_interval_ms = config.tick_interval_ms,
        seed_devices = config.seed_devices,
        "Loaded server configuration",
    );

    let addr: SocketAddr = match config.host.parse() {
        Ok(ip) => SocketAddr::new(ip, config.port),
        Err(e) => {
            tracing::error!(host = %config.host, error = %e, "Invalid HOST address");
            std::process::exit(1);
        }
    };

    // --- Event bus + simulator ---
    let event_bus = Arc::new(EventBus::default());
    let simulator = Simulator::seeded(
        config.seed_devices,
        config.log_capacity,
        Arc::clone(&event_bus),
    );
    tracing::info!(devices = config.seed_devices, "Dashboard seeded");

    let state = AppState::new(config.clone(), simulator);

    // --- WebSocket relay + heartbeat ---
    let relay = EventRelay::new(Arc::clone(&state.ws_manager));
    let relay_handle = tokio::spawn(relay.run(event_bus.subscribe()));
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&state.ws_manager));

    // --- Router ---
    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    if state.stream.stop().await {
        tracing::info!("Telemetry stream stopped");
    }

    let ws_count = state.ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    state.ws_manager.shutdown_all().await;

    // The relay exits once every handle on the event bus is gone.
    drop(state);
    drop(event_bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), relay_handle).await;

    heartbeat_handle.abort();
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
