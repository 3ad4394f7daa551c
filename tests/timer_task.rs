//! Timer task tests on tokio's paused clock

use std::time::Duration;

use lap_countdown::{
    spawn_timer,
    state::{LapEvent, Phase, TimerConfig},
    TimerError,
};
use tokio::time::sleep;

fn config(lap_duration_ms: u64, total_laps: u32) -> TimerConfig {
    TimerConfig::new(lap_duration_ms, total_laps).unwrap()
}

#[tokio::test(start_paused = true)]
async fn runs_through_laps_to_finished() {
    let (timer, _task) = spawn_timer(config(2000, 2));

    let snapshot = timer.play().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Running);
    assert_eq!(snapshot.time_left_ms, 2000);

    sleep(Duration::from_millis(1500)).await;
    assert_eq!(timer.snapshot().time_left_ms, 1000);

    sleep(Duration::from_millis(1000)).await;
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.current_lap, 2);
    assert_eq!(snapshot.time_left_ms, 2000);
    assert_eq!(snapshot.phase, Phase::Running);

    sleep(Duration::from_millis(2000)).await;
    let snapshot = timer.snapshot();
    assert_eq!(snapshot.phase, Phase::Finished);
    assert_eq!(snapshot.time_left_ms, 0);
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_remaining_time() {
    let (timer, _task) = spawn_timer(config(3000, 1));
    timer.play().await.unwrap();

    sleep(Duration::from_millis(1500)).await;
    let paused = timer.pause().await.unwrap();
    assert_eq!(paused.phase, Phase::Paused);
    assert_eq!(paused.time_left_ms, 1500);

    sleep(Duration::from_secs(30)).await;
    assert_eq!(timer.snapshot(), paused);

    let resumed = timer.play_pause().await.unwrap();
    assert_eq!(resumed.phase, Phase::Running);
    assert_eq!(resumed.time_left_ms, 1500);

    sleep(Duration::from_millis(600)).await;
    assert_eq!(timer.snapshot().time_left_ms, 1000);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(timer.snapshot().phase, Phase::Finished);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_ticking() {
    let (timer, _task) = spawn_timer(config(3000, 2));
    timer.play().await.unwrap();
    sleep(Duration::from_millis(1200)).await;

    let stopped = timer.stop().await.unwrap();
    assert_eq!(stopped, lap_countdown::TimerSnapshot::initial(&config(3000, 2)));

    let mut updates = timer.subscribe();
    sleep(Duration::from_secs(10)).await;
    assert!(!updates.has_changed().unwrap());
    assert_eq!(timer.snapshot(), stopped);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_only_new_changes() {
    let (timer, _task) = spawn_timer(config(3000, 1));
    timer.play().await.unwrap();

    let mut updates = timer.subscribe();
    assert!(!updates.has_changed().unwrap());

    updates.changed().await.unwrap();
    let snapshot = *updates.borrow_and_update();
    assert_eq!(snapshot.time_left_ms, 2000);
    assert_eq!(snapshot.phase, Phase::Running);
}

#[tokio::test(start_paused = true)]
async fn lap_events_are_broadcast() {
    let (timer, _task) = spawn_timer(config(1000, 2));
    let mut events = timer.lap_events();

    timer.play().await.unwrap();
    sleep(Duration::from_millis(2500)).await;

    assert_eq!(events.recv().await.unwrap(), LapEvent::LapCompleted { lap: 1 });
    assert_eq!(events.recv().await.unwrap(), LapEvent::Finished { total_laps: 2 });
}

#[tokio::test(start_paused = true)]
async fn configure_only_while_init() {
    let (timer, _task) = spawn_timer(config(10_000, 3));

    let snapshot = timer.configure_seconds(None, Some(5)).await.unwrap();
    assert_eq!(snapshot.total_laps, 5);
    assert_eq!(snapshot.time_left_ms, 10_000);

    let snapshot = timer.configure_seconds(Some(4), None).await.unwrap();
    assert_eq!(snapshot.time_left_ms, 4000);
    assert_eq!(snapshot.total_laps, 5);

    assert!(matches!(
        timer.configure(Some(0), None).await,
        Err(TimerError::InvalidConfiguration { .. })
    ));

    timer.play().await.unwrap();
    sleep(Duration::from_millis(1500)).await;
    let before = timer.snapshot();
    assert_eq!(before.time_left_ms, 3000);

    assert_eq!(
        timer.configure_seconds(Some(60), Some(1)).await,
        Err(TimerError::ConfigureWhileActive {
            phase: Phase::Running
        })
    );
    assert_eq!(timer.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn finished_timer_restarts_on_play_pause() {
    let (timer, _task) = spawn_timer(config(1000, 1));
    timer.play().await.unwrap();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(timer.snapshot().phase, Phase::Finished);

    let snapshot = timer.play_pause().await.unwrap();
    assert_eq!(snapshot.phase, Phase::Running);
    assert_eq!(snapshot.current_lap, 1);
    assert_eq!(snapshot.time_left_ms, 1000);
}

#[tokio::test(start_paused = true)]
async fn task_keeps_serving_after_a_run_finishes() {
    let (timer, task) = spawn_timer(config(2000, 1));
    timer.play().await.unwrap();
    sleep(Duration::from_millis(2500)).await;
    assert_eq!(timer.snapshot().phase, Phase::Finished);

    // Idle time after the run must not deliver anything
    let mut updates = timer.subscribe();
    sleep(Duration::from_secs(5)).await;
    assert!(!updates.has_changed().unwrap());
    assert!(!task.is_finished());

    let stopped = timer.stop().await.unwrap();
    assert_eq!(stopped.phase, Phase::Init);

    timer.play().await.unwrap();
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(timer.snapshot().time_left_ms, 1000);

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(timer.snapshot().phase, Phase::Finished);
    assert!(timer.play_pause().await.is_ok());
}

#[tokio::test]
async fn shutdown_closes_the_task() {
    let (timer, task) = spawn_timer(config(1000, 1));
    timer.play().await.unwrap();

    timer.shutdown().await;
    task.await.unwrap();

    assert!(timer.is_closed());
    assert_eq!(timer.play().await, Err(TimerError::TaskClosed));
}

#[tokio::test]
async fn dropping_every_handle_ends_the_task() {
    let (timer, task) = spawn_timer(config(1000, 1));
    let second = timer.clone();
    drop(timer);
    drop(second);

    task.await.unwrap();
}
