//! Background tasks module
//!
//! This module contains the countdown polling loop and the listeners that
//! react to timer notifications.

pub mod alert_player;
pub mod ticker;

// Re-export main functions
pub use alert_player::register_timer_listeners;
pub use ticker::ticker_task;
