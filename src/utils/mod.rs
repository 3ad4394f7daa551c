//! Utility functions module
//! 
//! This module contains display formatting and signal handling helpers.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_clock, format_lap, format_uptime};
pub use signals::shutdown_signal;
