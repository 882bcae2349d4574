//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{AlertConfig, SoundType, TimerConfig, TimerState};
use crate::{
    error::Result,
    services::{AudioPlayer, SettingsStore},
    timer::TimerEngine,
};

/// Main application state shared by the HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// Countdown engine
    pub engine: TimerEngine,
    /// Persisted timer and alert settings
    pub store: SettingsStore,
    /// Alert sound output
    pub audio: Arc<dyn AudioPlayer>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(
        engine: TimerEngine,
        store: SettingsStore,
        audio: Arc<dyn AudioPlayer>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            engine,
            store,
            audio,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Record a user intent; the first one also unlocks audio output
    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        if !self.audio.is_initialized() {
            if let Err(e) = self.audio.initialize() {
                warn!("Failed to initialize audio on first interaction: {}", e);
            }
        }
    }

    /// Apply a state-machine intent and return the resulting snapshot
    fn apply<F>(&self, action: &str, intent: F) -> TimerState
    where
        F: FnOnce(&TimerEngine),
    {
        self.record_action(action);
        intent(&self.engine);
        self.engine.get_state()
    }

    pub fn start(&self) -> TimerState {
        self.apply("start", TimerEngine::start)
    }

    pub fn pause(&self) -> TimerState {
        self.apply("pause", TimerEngine::pause)
    }

    pub fn resume(&self) -> TimerState {
        self.apply("resume", TimerEngine::resume)
    }

    pub fn reset(&self) -> TimerState {
        self.apply("reset", TimerEngine::reset)
    }

    pub fn restart(&self) -> TimerState {
        self.apply("restart", TimerEngine::restart)
    }

    /// Validate, persist and apply a new duration
    ///
    /// Nothing changes when validation or persistence fails.
    pub fn set_timer_config(&self, config: TimerConfig) -> Result<TimerState> {
        let total = config.checked_total_seconds()?;
        self.store.save_timer_config(&config)?;
        self.record_action("set-duration");
        self.engine.set_duration(total)?;
        info!(
            "Duration set to {}m {}s",
            config.duration_minutes, config.duration_seconds
        );
        Ok(self.engine.get_state())
    }

    /// Validate, persist and apply new alert settings
    pub fn set_alert_config(&self, config: AlertConfig) -> Result<AlertConfig> {
        config.validate()?;
        self.store.save_alert_config(&config)?;
        self.record_action("set-alerts");
        self.engine.set_alert_config(config.clone())?;
        self.audio.set_volume(config.volume);
        info!(
            "Alert config updated: enabled={}, volume={:.2}, points={}",
            config.enabled,
            config.volume,
            config.points.len()
        );
        Ok(config)
    }

    pub fn preview_sound(&self, sound: SoundType) {
        self.record_action("preview");
        self.audio.preview(sound);
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
