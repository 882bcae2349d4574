//! Presentation Timer - A countdown timer service for presentations
//!
//! This library provides the countdown state machine and alert scheduler,
//! the settings store and audio output they are wired to, and a small HTTP
//! API for driving the timer.

pub mod config;
pub mod error;
pub mod state;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use state::{AlertConfig, AlertPoint, AppState, SoundType, TimerConfig, TimerState, TimerStatus};
pub use timer::{format_elapsed, EventKind, TimerEngine, TimerEvent};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
