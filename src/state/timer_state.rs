//! Timer configuration, phase and snapshot structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TimerError;

/// Default lap duration used by a fresh timer screen
pub const DEFAULT_LAP_DURATION_MS: u64 = 10_000;
/// Default number of laps used by a fresh timer screen
pub const DEFAULT_TOTAL_LAPS: u32 = 3;
/// Longest accepted lap (one day)
pub const MAX_LAP_DURATION_MS: u64 = 24 * 60 * 60 * 1000;

/// Coarse-grained state of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Init,
    Running,
    Paused,
    Finished,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Running => "running",
            Phase::Paused => "paused",
            Phase::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lap duration and lap count for one timer run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimerConfig {
    lap_duration_ms: u64,
    total_laps: u32,
}

impl TimerConfig {
    /// Validate and build a configuration
    pub fn new(lap_duration_ms: u64, total_laps: u32) -> Result<Self, TimerError> {
        if lap_duration_ms == 0 || lap_duration_ms > MAX_LAP_DURATION_MS || total_laps == 0 {
            return Err(TimerError::InvalidConfiguration {
                lap_duration_ms,
                total_laps,
            });
        }

        Ok(Self {
            lap_duration_ms,
            total_laps,
        })
    }

    /// Build a configuration from a per-lap duration in whole seconds
    pub fn from_seconds(lap_duration_seconds: u64, total_laps: u32) -> Result<Self, TimerError> {
        Self::new(lap_duration_seconds.saturating_mul(1000), total_laps)
    }

    pub fn lap_duration_ms(&self) -> u64 {
        self.lap_duration_ms
    }

    pub fn total_laps(&self) -> u32 {
        self.total_laps
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            lap_duration_ms: DEFAULT_LAP_DURATION_MS,
            total_laps: DEFAULT_TOTAL_LAPS,
        }
    }
}

/// Immutable observation of the timer at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub time_left_ms: u64,
    pub phase: Phase,
    pub current_lap: u32,
    pub total_laps: u32,
}

impl TimerSnapshot {
    /// Snapshot of a timer that has not started yet
    pub fn initial(config: &TimerConfig) -> Self {
        Self {
            time_left_ms: config.lap_duration_ms(),
            phase: Phase::Init,
            current_lap: 1,
            total_laps: config.total_laps(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::initial(&TimerConfig::default())
    }
}

/// Completion signal emitted at lap boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LapEvent {
    /// `lap` just ended and the next one has started
    LapCompleted { lap: u32 },
    /// The final lap ended
    Finished { total_laps: u32 },
}
