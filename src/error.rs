//! Timer error types

use thiserror::Error;

use crate::state::Phase;

/// Errors reported by the timer engine and the task that owns it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid configuration: lap duration {lap_duration_ms}ms, {total_laps} laps (need a duration between 1ms and 24h and at least one lap)")]
    InvalidConfiguration { lap_duration_ms: u64, total_laps: u32 },

    #[error("timer can only be configured before it starts (current phase: {phase})")]
    ConfigureWhileActive { phase: Phase },

    #[error("timer task is no longer running")]
    TaskClosed,
}
