//! Settings persistence
//!
//! Timer and alert settings live in a single JSON file as two keyed entries.
//! Loading never fails: a missing, unreadable or invalid entry falls back to
//! the defaults. Saving validates first and refuses invalid settings.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    state::{AlertConfig, SoundType, TimerConfig},
};

pub const TIMER_CONFIG_KEY: &str = "presentation-timer:config";
pub const ALERT_CONFIG_KEY: &str = "presentation-timer:alert";

/// JSON-file backed settings store
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings file inside the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "presentation-timer")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    fn update_entry(&self, key: &str, value: Option<Value>) -> Result<()> {
        // An unreadable file is replaced rather than blocking saves forever
        let mut entries = self.read_entries().unwrap_or_else(|e| {
            warn!("Discarding unreadable settings file {}: {}", self.path.display(), e);
            Map::new()
        });
        match value {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
        self.write_entries(&entries)
    }

    fn load_entry(&self, key: &str) -> Option<Value> {
        match self.read_entries() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("Failed to read settings from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save_timer_config(&self, config: &TimerConfig) -> Result<()> {
        config.validate()?;
        self.update_entry(TIMER_CONFIG_KEY, Some(serde_json::to_value(config)?))?;
        debug!("Saved timer config to {}", self.path.display());
        Ok(())
    }

    /// Stored timer config, or the default when absent or invalid
    pub fn load_timer_config(&self) -> TimerConfig {
        let Some(value) = self.load_entry(TIMER_CONFIG_KEY) else {
            return TimerConfig::default();
        };
        match serde_json::from_value::<TimerConfig>(value) {
            Ok(config) if config.validate().is_ok() => config,
            _ => {
                warn!("Invalid stored timer config, using default");
                TimerConfig::default()
            }
        }
    }

    pub fn save_alert_config(&self, config: &AlertConfig) -> Result<()> {
        config.validate()?;
        self.update_entry(ALERT_CONFIG_KEY, Some(serde_json::to_value(config)?))?;
        debug!("Saved alert config to {}", self.path.display());
        Ok(())
    }

    /// Stored alert config after migration, or the default when absent or invalid
    pub fn load_alert_config(&self) -> AlertConfig {
        let Some(value) = self.load_entry(ALERT_CONFIG_KEY) else {
            return AlertConfig::default();
        };
        match serde_json::from_value::<AlertConfig>(migrate_alert_config(value)) {
            Ok(config) if config.validate().is_ok() => config,
            _ => {
                warn!("Invalid stored alert config after migration, using default");
                AlertConfig::default()
            }
        }
    }

    /// Remove both stored entries
    pub fn clear(&self) -> Result<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(TIMER_CONFIG_KEY);
        entries.remove(ALERT_CONFIG_KEY);
        self.write_entries(&entries)?;
        info!("Cleared stored settings");
        Ok(())
    }
}

/// Bring a stored alert config up to the current shape
///
/// Older versions stored `points` as bare second counts. Those become points
/// with the default sound; input already in the current shape is returned
/// unchanged, and input without a `points` array becomes the default config.
pub fn migrate_alert_config(config: Value) -> Value {
    let Value::Object(mut fields) = config else {
        warn!("Invalid alert config structure, using default");
        return default_alert_value();
    };
    let Some(Value::Array(points)) = fields.remove("points") else {
        warn!("Alert config without points array, using default");
        return default_alert_value();
    };

    let legacy = points.iter().any(Value::is_number);
    if legacy {
        info!("Migrating legacy alert config format");
    }

    let points = points
        .into_iter()
        .map(|point| match point {
            Value::Number(seconds) => json!({
                "seconds": seconds,
                "soundType": SoundType::default(),
            }),
            other => other,
        })
        .collect();

    fields.insert("points".to_string(), Value::Array(points));
    Value::Object(fields)
}

fn default_alert_value() -> Value {
    serde_json::to_value(AlertConfig::default()).unwrap_or(Value::Null)
}
