//! Lap Countdown - A lap-based countdown timer engine
//! 
//! This library provides the countdown state machine, the task that owns it,
//! and a small HTTP API that forwards user intents and renders its state.

pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{ManualScheduler, Scheduler, TimerEngine, TokioScheduler};
pub use error::TimerError;
pub use state::{AppState, Phase, TimerConfig, TimerSnapshot};
pub use api::create_router;
pub use tasks::{spawn_timer, TimerHandle};
pub use utils::signals::shutdown_signal;
