//! Countdown state machine

use tracing::{debug, info, warn};

use super::scheduler::{ManualScheduler, Scheduler, TickHandle};
use crate::{
    error::TimerError,
    state::{LapEvent, Phase, TimerConfig, TimerSnapshot},
};

/// Interval between ticks while running
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Identifies a registered observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type SnapshotObserver = Box<dyn FnMut(&TimerSnapshot) + Send>;
type LapObserver = Box<dyn FnMut(LapEvent) + Send>;

/// Owns the countdown state and applies every phase transition
///
/// Remaining time is derived from an absolute lap deadline on the
/// scheduler's clock, so late ticks never cause drift.
pub struct TimerEngine<S: Scheduler> {
    scheduler: S,
    config: TimerConfig,
    snapshot: TimerSnapshot,
    /// Clock time at which the current lap ends; only set while running
    lap_deadline_ms: Option<u64>,
    pending_tick: Option<TickHandle>,
    observers: Vec<(SubscriptionId, SnapshotObserver)>,
    lap_observers: Vec<(SubscriptionId, LapObserver)>,
    next_subscription: u64,
}

impl<S: Scheduler> TimerEngine<S> {
    /// Create an engine in the `Init` phase
    pub fn new(scheduler: S, config: TimerConfig) -> Self {
        Self {
            scheduler,
            config,
            snapshot: TimerSnapshot::initial(&config),
            lap_deadline_ms: None,
            pending_tick: None,
            observers: Vec::new(),
            lap_observers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state of the countdown
    pub fn snapshot(&self) -> TimerSnapshot {
        self.snapshot
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Register an observer that receives every emitted snapshot
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&TimerSnapshot) + Send + 'static,
    {
        let id = self.next_subscription_id();
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Register an observer for lap boundaries and run completion
    pub fn on_lap_complete<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(LapEvent) + Send + 'static,
    {
        let id = self.next_subscription_id();
        self.lap_observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false if the id was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len() + self.lap_observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.lap_observers.retain(|(registered, _)| *registered != id);
        before != self.observers.len() + self.lap_observers.len()
    }

    /// Replace the configuration. Only accepted before the run starts.
    pub fn configure(&mut self, config: TimerConfig) -> Result<TimerSnapshot, TimerError> {
        if self.snapshot.phase != Phase::Init {
            debug!("Ignoring configuration change while {}", self.snapshot.phase);
            return Err(TimerError::ConfigureWhileActive {
                phase: self.snapshot.phase,
            });
        }

        info!(
            "Configured timer: {}ms per lap, {} laps",
            config.lap_duration_ms(),
            config.total_laps()
        );
        self.config = config;
        self.snapshot = TimerSnapshot::initial(&config);
        self.emit();
        Ok(self.snapshot)
    }

    /// Change only the lap duration
    pub fn set_lap_duration_ms(&mut self, lap_duration_ms: u64) -> Result<TimerSnapshot, TimerError> {
        let config = TimerConfig::new(lap_duration_ms, self.config.total_laps())?;
        self.configure(config)
    }

    /// Change only the number of laps
    pub fn set_total_laps(&mut self, total_laps: u32) -> Result<TimerSnapshot, TimerError> {
        let config = TimerConfig::new(self.config.lap_duration_ms(), total_laps)?;
        self.configure(config)
    }

    /// Start, resume, or restart a finished run
    pub fn play(&mut self) -> TimerSnapshot {
        match self.snapshot.phase {
            Phase::Init | Phase::Paused => self.start_running(),
            Phase::Running => debug!("Timer already running"),
            Phase::Finished => {
                info!("Restarting finished timer");
                self.reset();
                self.start_running();
            }
        }
        self.snapshot
    }

    /// Freeze the countdown, keeping the exact remaining time
    pub fn pause(&mut self) -> TimerSnapshot {
        if !self.snapshot.is_running() {
            debug!("Pause ignored while {}", self.snapshot.phase);
            return self.snapshot;
        }

        self.cancel_pending_tick();
        let now = self.scheduler.now_ms();
        self.catch_up(now);

        // Catching up may have completed the final lap
        if self.snapshot.is_running() {
            self.lap_deadline_ms = None;
            self.snapshot.phase = Phase::Paused;
            info!(
                "Timer paused on lap {}/{} with {}ms left",
                self.snapshot.current_lap, self.snapshot.total_laps, self.snapshot.time_left_ms
            );
            self.emit();
        }
        self.snapshot
    }

    /// The single toggle intent: pause when running, play otherwise
    pub fn play_pause(&mut self) -> TimerSnapshot {
        match self.snapshot.phase {
            Phase::Running => self.pause(),
            Phase::Init | Phase::Paused | Phase::Finished => self.play(),
        }
    }

    /// Cancel any pending tick and return to lap 1 with the full duration
    pub fn stop(&mut self) -> TimerSnapshot {
        self.reset();
        self.snapshot
    }

    /// Same as [`TimerEngine::stop`]
    pub fn reset(&mut self) {
        self.cancel_pending_tick();
        self.lap_deadline_ms = None;

        let initial = TimerSnapshot::initial(&self.config);
        if self.snapshot != initial {
            info!("Timer reset");
            self.snapshot = initial;
            self.emit();
        }
    }

    /// Deliver a tick previously requested from the scheduler
    pub fn on_tick(&mut self, handle: TickHandle) {
        if self.pending_tick != Some(handle) {
            debug_assert!(false, "tick {} delivered without being scheduled", handle.id());
            warn!("Ignoring stale tick {}", handle.id());
            return;
        }
        // Delivered ticks must leave the scheduler too, or it keeps reporting them as due
        self.cancel_pending_tick();

        let now = self.scheduler.now_ms();
        if self.catch_up(now) {
            debug!(
                "Tick: lap {}/{}, {}ms left",
                self.snapshot.current_lap, self.snapshot.total_laps, self.snapshot.time_left_ms
            );
            self.emit();
        }

        if self.snapshot.is_running() {
            self.schedule_next_tick();
        }
    }

    fn start_running(&mut self) {
        let now = self.scheduler.now_ms();
        self.lap_deadline_ms = Some(now + self.snapshot.time_left_ms);
        self.snapshot.phase = Phase::Running;
        info!(
            "Timer running on lap {}/{} with {}ms left",
            self.snapshot.current_lap, self.snapshot.total_laps, self.snapshot.time_left_ms
        );
        self.schedule_next_tick();
        self.emit();
    }

    /// Complete every lap whose deadline has passed, then refresh the
    /// remaining time. Returns true when the remaining time changed and has
    /// not been emitted yet.
    fn catch_up(&mut self, now: u64) -> bool {
        while let Some(deadline) = self.lap_deadline_ms {
            if now < deadline {
                let time_left = deadline - now;
                let changed = time_left != self.snapshot.time_left_ms;
                self.snapshot.time_left_ms = time_left;
                return changed;
            }
            self.complete_lap(deadline);
        }
        false
    }

    fn complete_lap(&mut self, deadline: u64) {
        let lap = self.snapshot.current_lap;

        if lap < self.config.total_laps() {
            let lap_duration = self.config.lap_duration_ms();
            self.lap_deadline_ms = Some(deadline + lap_duration);
            self.snapshot.current_lap = lap + 1;
            self.snapshot.time_left_ms = lap_duration;
            info!("Lap {}/{} complete", lap, self.config.total_laps());
            self.emit();
            self.notify_lap(LapEvent::LapCompleted { lap });
        } else {
            self.cancel_pending_tick();
            self.lap_deadline_ms = None;
            self.snapshot.time_left_ms = 0;
            self.snapshot.phase = Phase::Finished;
            info!("Timer finished after {} laps", self.config.total_laps());
            self.emit();
            self.notify_lap(LapEvent::Finished {
                total_laps: self.config.total_laps(),
            });
        }
    }

    /// Align the next tick with the next whole second of remaining time
    fn schedule_next_tick(&mut self) {
        self.cancel_pending_tick();

        let remainder = self.snapshot.time_left_ms % TICK_INTERVAL_MS;
        let delay = if remainder == 0 { TICK_INTERVAL_MS } else { remainder };
        self.pending_tick = Some(self.scheduler.schedule_tick(delay));
    }

    fn cancel_pending_tick(&mut self) {
        if let Some(handle) = self.pending_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn emit(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.snapshot);
        }
    }

    fn notify_lap(&mut self, event: LapEvent) {
        for (_, observer) in self.lap_observers.iter_mut() {
            observer(event);
        }
    }

    fn next_subscription_id(&mut self) -> SubscriptionId {
        self.next_subscription += 1;
        SubscriptionId(self.next_subscription)
    }
}

impl TimerEngine<ManualScheduler> {
    /// Move the manual clock forward by `ms`, delivering every tick that
    /// falls due on the way
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now_ms() + ms;
        while let Some(handle) = self.scheduler.pop_due(target) {
            self.on_tick(handle);
        }
        self.scheduler.set_now(target);
    }

    /// Deliver ticks that are already overdue
    pub fn fire_due(&mut self) {
        self.advance(0);
    }
}

impl<S: Scheduler> Drop for TimerEngine<S> {
    fn drop(&mut self) {
        self.cancel_pending_tick();
    }
}

impl<S: Scheduler> std::fmt::Debug for TimerEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("snapshot", &self.snapshot)
            .field("lap_deadline_ms", &self.lap_deadline_ms)
            .field("pending_tick", &self.pending_tick)
            .field("observers", &self.observers.len())
            .finish()
    }
}
