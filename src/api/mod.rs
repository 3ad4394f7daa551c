//! HTTP API module
//!
//! This module contains the HTTP endpoints that forward user intents to the timer
//! and the response structures that render its state.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/configure", post(configure_handler))
        .route("/play-pause", post(play_pause_handler))
        .route("/play", post(play_handler))
        .route("/pause", post(pause_handler))
        .route("/stop", post(stop_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
