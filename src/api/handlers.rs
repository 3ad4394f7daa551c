//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::{info, warn};

use crate::{error::TimerError, state::AppState};
use super::responses::{HealthResponse, StatusResponse, TimerView};

/// Body of POST /configure; missing fields keep their current value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigureRequest {
    pub lap_duration_seconds: Option<u64>,
    pub total_laps: Option<u32>,
}

/// Handle POST /configure - Set seconds per lap and number of laps
pub async fn configure_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ConfigureRequest>,
) -> Result<Json<TimerView>, TimerError> {
    match state
        .timer
        .configure_seconds(request.lap_duration_seconds, request.total_laps)
        .await
    {
        Ok(snapshot) => {
            state.record_action("configure");
            info!(
                "Configure endpoint called - {}ms per lap, {} laps",
                snapshot.time_left_ms, snapshot.total_laps
            );
            Ok(Json(snapshot.into()))
        }
        Err(e) => {
            warn!("Configuration rejected: {}", e);
            Err(e)
        }
    }
}

/// Handle POST /play-pause - Toggle the timer
pub async fn play_pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerView>, TimerError> {
    let snapshot = state.timer.play_pause().await?;
    state.record_action("play-pause");
    info!("Play-pause endpoint called - timer now {}", snapshot.phase);
    Ok(Json(snapshot.into()))
}

/// Handle POST /play - Start, resume or restart the timer
pub async fn play_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerView>, TimerError> {
    let snapshot = state.timer.play().await?;
    state.record_action("play");
    info!("Play endpoint called - timer now {}", snapshot.phase);
    Ok(Json(snapshot.into()))
}

/// Handle POST /pause - Pause a running timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerView>, TimerError> {
    let snapshot = state.timer.pause().await?;
    state.record_action("pause");
    info!("Pause endpoint called - timer now {}", snapshot.phase);
    Ok(Json(snapshot.into()))
}

/// Handle POST /stop - Reset the timer to lap 1
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TimerView>, TimerError> {
    let snapshot = state.timer.stop().await?;
    state.record_action("stop");
    info!("Stop endpoint called - timer reset");
    Ok(Json(snapshot.into()))
}

/// Handle GET /status - Return the current timer view
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.timer.snapshot().into(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
