//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    state::{Phase, TimerSnapshot},
    utils::{format_clock, format_lap},
};

/// What the play/pause button does for a given phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Play,
    Pause,
    Restart,
}

impl From<Phase> for ButtonAction {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Init | Phase::Paused => ButtonAction::Play,
            Phase::Running => ButtonAction::Pause,
            Phase::Finished => ButtonAction::Restart,
        }
    }
}

/// Renderable view of one snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    pub time_left_ms: u64,
    pub phase: Phase,
    pub current_lap: u32,
    pub total_laps: u32,
    pub display: String,
    pub lap_label: String,
    pub action: ButtonAction,
    pub timestamp: DateTime<Utc>,
}

impl From<TimerSnapshot> for TimerView {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            time_left_ms: snapshot.time_left_ms,
            phase: snapshot.phase,
            current_lap: snapshot.current_lap,
            total_laps: snapshot.total_laps,
            display: format_clock(snapshot.time_left_ms),
            lap_label: format_lap(snapshot.current_lap, snapshot.total_laps),
            action: snapshot.phase.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Status response with timer view and server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for rejected intents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = match self {
            TimerError::InvalidConfiguration { .. } => StatusCode::BAD_REQUEST,
            TimerError::ConfigureWhileActive { .. } => StatusCode::CONFLICT,
            TimerError::TaskClosed => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_action_follows_phase() {
        assert_eq!(ButtonAction::from(Phase::Init), ButtonAction::Play);
        assert_eq!(ButtonAction::from(Phase::Paused), ButtonAction::Play);
        assert_eq!(ButtonAction::from(Phase::Running), ButtonAction::Pause);
        assert_eq!(ButtonAction::from(Phase::Finished), ButtonAction::Restart);
    }

    #[test]
    fn view_formats_snapshot() {
        let view = TimerView::from(TimerSnapshot {
            time_left_ms: 75_400,
            phase: Phase::Running,
            current_lap: 2,
            total_laps: 3,
        });

        assert_eq!(view.display, "01:15");
        assert_eq!(view.lap_label, "Lap 2 / 3");
        assert_eq!(view.action, ButtonAction::Pause);
    }

    #[test]
    fn errors_map_to_status_codes() {
        let invalid = TimerError::InvalidConfiguration {
            lap_duration_ms: 0,
            total_laps: 1,
        };
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let active = TimerError::ConfigureWhileActive {
            phase: Phase::Running,
        };
        assert_eq!(active.into_response().status(), StatusCode::CONFLICT);

        assert_eq!(
            TimerError::TaskClosed.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
