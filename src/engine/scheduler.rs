//! Tick scheduling abstraction
//!
//! The engine never sleeps itself. It asks a [`Scheduler`] for a tick after a
//! delay and the host delivers that tick back through
//! [`TimerEngine::on_tick`](super::TimerEngine::on_tick).

use std::{collections::BTreeMap, time::Duration};

use tokio::time::Instant;
use tracing::warn;

/// Identifies one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Clock plus deferred tick delivery
pub trait Scheduler {
    /// Monotonic milliseconds since an arbitrary origin
    fn now_ms(&self) -> u64;

    /// Request a tick `delay_ms` from now
    fn schedule_tick(&mut self, delay_ms: u64) -> TickHandle;

    /// Forget a scheduled tick. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Scheduler backed by the tokio clock
///
/// Holds at most one pending tick. The task owning the engine awaits
/// [`TokioScheduler::next_due`] with `sleep_until`.
#[derive(Debug)]
pub struct TokioScheduler {
    origin: Instant,
    next_id: u64,
    pending: Option<(TickHandle, Instant)>,
}

impl TokioScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            next_id: 0,
            pending: None,
        }
    }

    /// The pending tick and the instant it becomes due
    pub fn next_due(&self) -> Option<(TickHandle, Instant)> {
        self.pending
    }
}

impl Default for TokioScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for TokioScheduler {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn schedule_tick(&mut self, delay_ms: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);

        if let Some((previous, _)) = self.pending {
            warn!("Replacing tick {} that was never cancelled", previous.id());
        }

        let due = self.origin + Duration::from_millis(self.now_ms() + delay_ms);
        self.pending = Some((handle, due));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }
}

/// Hand-driven clock for tests and simulations
///
/// Time only moves when told to. Drive it through
/// [`TimerEngine::advance`](super::TimerEngine::advance) so due ticks are
/// delivered to the engine in order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    pending: BTreeMap<TickHandle, u64>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward without delivering anything, like a host
    /// that was suspended while a tick was due.
    pub fn skip(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Number of ticks scheduled and not yet delivered or cancelled
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Due time of the earliest pending tick
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.values().copied().min()
    }

    /// Remove the earliest tick due at or before `up_to_ms` and move the
    /// clock to its due time (never backwards).
    pub(crate) fn pop_due(&mut self, up_to_ms: u64) -> Option<TickHandle> {
        let (handle, due) = self
            .pending
            .iter()
            .filter(|(_, due)| **due <= up_to_ms)
            .min_by_key(|(handle, due)| (**due, **handle))
            .map(|(handle, due)| (*handle, *due))?;

        self.pending.remove(&handle);
        self.now_ms = self.now_ms.max(due);
        Some(handle)
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}

impl Scheduler for ManualScheduler {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn schedule_tick(&mut self, delay_ms: u64) -> TickHandle {
        self.next_id += 1;
        let handle = TickHandle(self.next_id);
        self.pending.insert(handle, self.now_ms + delay_ms);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.pending.remove(&handle);
    }
}
