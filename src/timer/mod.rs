//! Countdown core
//!
//! This module contains the timer state machine, the alert scheduler and
//! the helpers they share.

pub mod clock;
pub mod engine;
pub mod events;
pub mod format;
pub mod scheduler;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{EngineOptions, TimerEngine, WeakTimerEngine, DEFAULT_POLL_INTERVAL};
pub use events::{AlertEvent, EventKind, ListenerId, TimerEvent};
pub use format::format_elapsed;
pub use scheduler::AlertScheduler;
