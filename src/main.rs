//! Lap Countdown - A lap-based countdown timer
//! 
//! This is the main entry point for the lap-countdown application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use lap_countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{snapshot_logger_task, spawn_timer},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("lap_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting lap-countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, lap={}s, laps={}",
          config.host, config.port, config.lap_seconds, config.laps);

    let timer_config = config.timer_config()?;

    // Start the task that owns the timer engine
    let (timer, timer_task) = spawn_timer(timer_config);

    // Log transitions as they happen
    tokio::spawn(snapshot_logger_task(timer.subscribe(), timer.lap_events()));

    // Create application state and HTTP router
    let state = Arc::new(AppState::new(timer.clone(), config.port, config.host.clone()));
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /configure  - Set lap duration (seconds) and lap count");
    info!("  POST /play-pause - Toggle the timer");
    info!("  POST /play       - Start, resume or restart");
    info!("  POST /pause      - Pause the timer");
    info!("  POST /stop       - Reset to lap 1");
    info!("  GET  /status     - Current timer view");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    timer.shutdown().await;
    if let Err(e) = timer_task.await {
        tracing::error!("Timer task failed: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
