//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::state::TimerConfig;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "presentation-timer")]
#[command(about = "A countdown timer service for presentations with audible alerts")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown minutes (overrides the stored setting)
    #[arg(short, long)]
    pub minutes: Option<u32>,

    /// Countdown seconds, below 60 (overrides the stored setting)
    #[arg(short, long)]
    pub seconds: Option<u32>,

    /// Settings file (defaults to the platform config directory)
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Polling loop interval in milliseconds
    #[arg(long, default_value = "100")]
    pub poll_interval_ms: u64,

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

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Settings file path, falling back to the working directory when the
    /// platform has no config directory
    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .or_else(crate::services::SettingsStore::default_path)
            .unwrap_or_else(|| PathBuf::from("presentation-timer.json"))
    }

    /// Duration from the command line, layered over the stored one
    pub fn timer_config(&self, stored: TimerConfig) -> Option<TimerConfig> {
        if self.minutes.is_none() && self.seconds.is_none() {
            return None;
        }
        Some(TimerConfig::new(
            self.minutes.unwrap_or(stored.duration_minutes),
            self.seconds.unwrap_or(stored.duration_seconds),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["presentation-timer"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
        assert!(config.timer_config(TimerConfig::default()).is_none());
    }

    #[test]
    fn test_cli_duration_overrides_stored() {
        let config = Config::try_parse_from(["presentation-timer", "--minutes", "12"]).unwrap();
        assert_eq!(
            config.timer_config(TimerConfig::new(5, 30)),
            Some(TimerConfig::new(12, 30))
        );
    }

    #[test]
    fn test_explicit_settings_path() {
        let config =
            Config::try_parse_from(["presentation-timer", "--settings", "/tmp/timer.json", "-v"]).unwrap();
        assert_eq!(config.settings_path(), PathBuf::from("/tmp/timer.json"));
        assert_eq!(config.log_level(), "debug");
    }
}
