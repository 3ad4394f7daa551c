//! HTTP API tests

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use lap_countdown::{create_router, spawn_timer, AppState, TimerConfig};
use serde_json::Value;
use tower::ServiceExt;

fn app() -> Router {
    let (timer, _task) = spawn_timer(TimerConfig::default());
    create_router(Arc::new(AppState::new(timer, 20554, "127.0.0.1".to_string())))
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn status_renders_initial_screen() {
    let app = app();
    let (status, body) = call(&app, "GET", "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "init");
    assert_eq!(body["timer"]["display"], "00:10");
    assert_eq!(body["timer"]["lap_label"], "Lap 1 / 3");
    assert_eq!(body["timer"]["action"], "play");
    assert_eq!(body["port"], 20554);
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn configure_then_run_then_stop() {
    let app = app();

    let (status, body) = call(
        &app,
        "POST",
        "/configure",
        Some(serde_json::json!({ "lap_duration_seconds": 90, "total_laps": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["display"], "01:30");
    assert_eq!(body["total_laps"], 2);

    let (status, body) = call(&app, "POST", "/play-pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "running");
    assert_eq!(body["action"], "pause");

    let (status, body) = call(
        &app,
        "POST",
        "/configure",
        Some(serde_json::json!({ "total_laps": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (_, body) = call(&app, "POST", "/pause", None).await;
    assert_eq!(body["phase"], "paused");
    assert_eq!(body["action"], "play");

    let (_, body) = call(&app, "POST", "/play", None).await;
    assert_eq!(body["phase"], "running");

    let (status, body) = call(&app, "POST", "/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phase"], "init");
    assert_eq!(body["display"], "01:30");
    assert_eq!(body["current_lap"], 1);

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["last_action"], "stop");
}

#[tokio::test]
async fn invalid_configuration_is_a_bad_request() {
    let app = app();
    let (status, body) = call(
        &app,
        "POST",
        "/configure",
        Some(serde_json::json!({ "lap_duration_seconds": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (_, body) = call(&app, "GET", "/status", None).await;
    assert_eq!(body["timer"]["display"], "00:10");
}

#[tokio::test]
async fn health_check() {
    let app = app();
    let (status, body) = call(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
