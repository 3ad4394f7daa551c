//! Background tasks module
//! 
//! This module contains the task that owns the timer engine and the tasks that observe it.

pub mod snapshot_logger;
pub mod timer_task;

// Re-export main functions
pub use snapshot_logger::snapshot_logger_task;
pub use timer_task::{spawn_timer, timer_task, TimerCommand, TimerHandle, TimerIntent};
