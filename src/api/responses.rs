//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{AlertConfig, TimerState},
    timer::format_elapsed,
};

/// Timer snapshot with its display string
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    #[serde(flatten)]
    pub state: TimerState,
    /// `MM:SS`, prefixed with `-` in overtime
    pub display: String,
    pub overtime: bool,
}

impl From<TimerState> for TimerResponse {
    fn from(state: TimerState) -> Self {
        Self {
            display: format_elapsed(state.remaining_seconds),
            overtime: state.is_overtime(),
            state,
        }
    }
}

/// API response structure for timer intent endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerResponse,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    /// Create an ok response
    pub fn ok(message: String, timer: TimerState) -> Self {
        Self::new("ok".to_string(), message, timer)
    }
}

/// Error body for rejected requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
        }
    }
}

/// Alert settings response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub status: String,
    pub alerts: AlertConfig,
    pub audio_ready: bool,
}

/// Enhanced status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerResponse,
    pub alerts: AlertConfig,
    pub audio_ready: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
