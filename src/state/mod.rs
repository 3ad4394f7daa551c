//! State management module
//! 
//! This module contains the timer data types and the application state handed to the API.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use timer_state::{
    LapEvent, Phase, TimerConfig, TimerSnapshot, DEFAULT_LAP_DURATION_MS, DEFAULT_TOTAL_LAPS,
    MAX_LAP_DURATION_MS,
};
