//! Configuration and CLI argument handling

use clap::Parser;

use crate::{error::TimerError, state::TimerConfig};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "lap-countdown")]
#[command(about = "A lap-based countdown timer with a small HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Initial duration of one lap in seconds
    #[arg(short, long, default_value = "10")]
    pub lap_seconds: u64,

    /// Initial number of laps
    #[arg(short = 'n', long, default_value = "3")]
    pub laps: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validated timer configuration for the initial screen
    pub fn timer_config(&self) -> Result<TimerConfig, TimerError> {
        TimerConfig::from_seconds(self.lap_seconds, self.laps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_timer_screen() {
        let config = Config::try_parse_from(["lap-countdown"]).unwrap();
        assert_eq!(config.port, 20554);
        assert_eq!(config.address(), "0.0.0.0:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.timer_config().unwrap(), TimerConfig::default());
    }

    #[test]
    fn rejects_zero_laps() {
        let config = Config::try_parse_from(["lap-countdown", "--laps", "0", "-v"]).unwrap();
        assert_eq!(config.log_level(), "debug");
        assert!(config.timer_config().is_err());
    }
}
