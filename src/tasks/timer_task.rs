//! Timer background task
//!
//! The task is the single owner of the [`TimerEngine`]. Every intent goes
//! through its command queue and every tick is awaited inside the same
//! `select!`, so engine operations never run concurrently.

use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
    time::{sleep_until, Instant},
};
use tracing::{debug, info};

use crate::{
    engine::{TickHandle, TimerEngine, TokioScheduler},
    error::TimerError,
    state::{LapEvent, TimerConfig, TimerSnapshot},
};

const COMMAND_QUEUE_SIZE: usize = 32;
const LAP_EVENT_CAPACITY: usize = 16;

/// User intents forwarded to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerIntent {
    /// Missing fields keep their current value
    Configure {
        lap_duration_ms: Option<u64>,
        total_laps: Option<u32>,
    },
    Play,
    Pause,
    PlayPause,
    Stop,
}

/// Messages accepted by the timer task
#[derive(Debug)]
pub enum TimerCommand {
    Apply {
        intent: TimerIntent,
        reply: oneshot::Sender<Result<TimerSnapshot, TimerError>>,
    },
    Shutdown,
}

/// Cloneable front end to a running timer task
#[derive(Debug, Clone)]
pub struct TimerHandle {
    commands: mpsc::Sender<TimerCommand>,
    snapshots: watch::Receiver<TimerSnapshot>,
    lap_events: broadcast::Sender<LapEvent>,
}

impl TimerHandle {
    /// Update lap duration and/or lap count (only while the timer is in `Init`)
    pub async fn configure(
        &self,
        lap_duration_ms: Option<u64>,
        total_laps: Option<u32>,
    ) -> Result<TimerSnapshot, TimerError> {
        self.send(TimerIntent::Configure {
            lap_duration_ms,
            total_laps,
        })
        .await
    }

    /// Same as [`TimerHandle::configure`] with the lap duration in seconds
    pub async fn configure_seconds(
        &self,
        lap_duration_seconds: Option<u64>,
        total_laps: Option<u32>,
    ) -> Result<TimerSnapshot, TimerError> {
        self.configure(lap_duration_seconds.map(|s| s.saturating_mul(1000)), total_laps)
            .await
    }

    pub async fn play(&self) -> Result<TimerSnapshot, TimerError> {
        self.send(TimerIntent::Play).await
    }

    pub async fn pause(&self) -> Result<TimerSnapshot, TimerError> {
        self.send(TimerIntent::Pause).await
    }

    pub async fn play_pause(&self) -> Result<TimerSnapshot, TimerError> {
        self.send(TimerIntent::PlayPause).await
    }

    pub async fn stop(&self) -> Result<TimerSnapshot, TimerError> {
        self.send(TimerIntent::Stop).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> TimerSnapshot {
        *self.snapshots.borrow()
    }

    /// Receiver that is notified on the next change after this call
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        let mut receiver = self.snapshots.clone();
        receiver.borrow_and_update();
        receiver
    }

    /// Lap boundary and completion events
    pub fn lap_events(&self) -> broadcast::Receiver<LapEvent> {
        self.lap_events.subscribe()
    }

    /// Ask the task to exit, dropping the engine and any pending tick
    pub async fn shutdown(&self) {
        if self.commands.send(TimerCommand::Shutdown).await.is_err() {
            debug!("Timer task already stopped");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn send(&self, intent: TimerIntent) -> Result<TimerSnapshot, TimerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(TimerCommand::Apply { intent, reply })
            .await
            .map_err(|_| TimerError::TaskClosed)?;
        response.await.map_err(|_| TimerError::TaskClosed)?
    }
}

/// Build an engine for `config` and run it on its own task
pub fn spawn_timer(config: TimerConfig) -> (TimerHandle, JoinHandle<()>) {
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let (snapshot_tx, snapshot_rx) = watch::channel(TimerSnapshot::initial(&config));
    let (lap_tx, _) = broadcast::channel(LAP_EVENT_CAPACITY);

    let mut engine = TimerEngine::new(TokioScheduler::new(), config);
    engine.subscribe(move |snapshot| {
        snapshot_tx.send_replace(*snapshot);
    });

    let lap_sender = lap_tx.clone();
    engine.on_lap_complete(move |event| {
        if lap_sender.send(event).is_err() {
            debug!("No listeners for lap event {:?}", event);
        }
    });

    let task = tokio::spawn(timer_task(engine, command_rx));
    let handle = TimerHandle {
        commands: command_tx,
        snapshots: snapshot_rx,
        lap_events: lap_tx,
    };

    (handle, task)
}

/// Serve commands and ticks until shutdown or until every handle is dropped
pub async fn timer_task(
    mut engine: TimerEngine<TokioScheduler>,
    mut commands: mpsc::Receiver<TimerCommand>,
) {
    info!("Starting timer task");

    loop {
        let next_tick = engine.scheduler().next_due();

        tokio::select! {
            command = commands.recv() => match command {
                Some(TimerCommand::Apply { intent, reply }) => {
                    let result = apply_intent(&mut engine, intent);
                    if reply.send(result).is_err() {
                        debug!("Caller went away before {:?} completed", intent);
                    }
                }
                Some(TimerCommand::Shutdown) => {
                    info!("Timer shutdown requested");
                    break;
                }
                None => {
                    debug!("All timer handles dropped");
                    break;
                }
            },

            handle = wait_for_tick(next_tick) => engine.on_tick(handle),
        }
    }

    info!("Timer task stopped");
}

fn apply_intent(
    engine: &mut TimerEngine<TokioScheduler>,
    intent: TimerIntent,
) -> Result<TimerSnapshot, TimerError> {
    match intent {
        TimerIntent::Configure {
            lap_duration_ms,
            total_laps,
        } => {
            let current = engine.config();
            let config = TimerConfig::new(
                lap_duration_ms.unwrap_or(current.lap_duration_ms()),
                total_laps.unwrap_or(current.total_laps()),
            )?;
            engine.configure(config)
        }
        TimerIntent::Play => Ok(engine.play()),
        TimerIntent::Pause => Ok(engine.pause()),
        TimerIntent::PlayPause => Ok(engine.play_pause()),
        TimerIntent::Stop => Ok(engine.stop()),
    }
}

async fn wait_for_tick(next: Option<(TickHandle, Instant)>) -> TickHandle {
    match next {
        Some((handle, due)) => {
            sleep_until(due).await;
            handle
        }
        None => std::future::pending().await,
    }
}
