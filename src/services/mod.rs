//! Collaborator services module
//!
//! This module contains the settings store and the audio output the timer
//! relies on. The countdown core never touches either directly.

pub mod audio;
pub mod storage;

// Re-export main types
pub use audio::{AudioPlayer, RodioPlayer};
pub use storage::{migrate_alert_config, SettingsStore};
