//! Timer state structure and management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    #[default]
    Idle,
    Running,
    Paused,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

/// Snapshot of the countdown handed out to callers
///
/// `remaining_seconds == duration_seconds - elapsed_seconds` holds for every
/// snapshot, and `started_at` is set only while running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub duration_seconds: u32,
    /// Negative once the countdown overruns
    pub remaining_seconds: i64,
    pub elapsed_seconds: u64,
    pub started_at: Option<DateTime<Utc>>,
}

impl TimerState {
    /// Create a fresh idle state for the given duration
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            status: TimerStatus::Idle,
            duration_seconds,
            remaining_seconds: i64::from(duration_seconds),
            elapsed_seconds: 0,
            started_at: None,
        }
    }

    /// Set the elapsed seconds and keep remaining time consistent with it
    pub(crate) fn set_elapsed(&mut self, elapsed_seconds: u64) {
        self.elapsed_seconds = elapsed_seconds;
        self.remaining_seconds = i64::from(self.duration_seconds) - elapsed_seconds as i64;
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Whether the countdown has run past zero
    pub fn is_overtime(&self) -> bool {
        self.remaining_seconds < 0
    }
}
