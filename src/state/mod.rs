//! State management module
//!
//! This module contains the countdown data model, the alert and timer
//! settings, and the application state shared by the HTTP handlers.

pub mod alert_config;
pub mod app_state;
pub mod sound;
pub mod timer_config;
pub mod timer_state;

// Re-export main types
pub use alert_config::{AlertConfig, AlertPoint};
pub use app_state::AppState;
pub use sound::SoundType;
pub use timer_config::TimerConfig;
pub use timer_state::{TimerState, TimerStatus};
