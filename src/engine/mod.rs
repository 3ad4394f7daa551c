//! Countdown engine module
//!
//! This module contains the timer state machine and the tick schedulers that drive it.

pub mod scheduler;
pub mod timer_engine;

// Re-export main types
pub use scheduler::{ManualScheduler, Scheduler, TickHandle, TokioScheduler};
pub use timer_engine::{SubscriptionId, TimerEngine, TICK_INTERVAL_MS};
