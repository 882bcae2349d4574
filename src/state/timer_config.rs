//! Minutes/seconds timer configuration as entered by the user

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    pub duration_minutes: u32,
    /// Always below 60
    pub duration_seconds: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(5, 0)
    }
}

impl TimerConfig {
    pub fn new(duration_minutes: u32, duration_seconds: u32) -> Self {
        Self {
            duration_minutes,
            duration_seconds,
        }
    }

    /// Total countdown length in seconds
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.duration_minutes) * 60 + u64::from(self.duration_seconds)
    }

    /// Split a total number of seconds into minutes and seconds
    pub fn from_total_seconds(total_seconds: u32) -> Self {
        Self::new(total_seconds / 60, total_seconds % 60)
    }

    pub fn validate(&self) -> Result<()> {
        if self.duration_seconds >= 60 {
            return Err(Error::InvalidTimerConfig(format!(
                "seconds must be below 60, got {}",
                self.duration_seconds
            )));
        }
        match self.total_seconds() {
            0 => Err(Error::InvalidTimerConfig("total duration must be positive".to_string())),
            total if total > u64::from(u32::MAX) => Err(Error::InvalidTimerConfig(format!(
                "total duration of {} seconds is too long",
                total
            ))),
            _ => Ok(()),
        }
    }

    /// Validated total duration, ready for the engine
    pub fn checked_total_seconds(&self) -> Result<u32> {
        self.validate()?;
        u32::try_from(self.total_seconds())
            .map_err(|_| Error::InvalidTimerConfig("total duration is too long".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_five_minutes() {
        let config = TimerConfig::default();
        assert_eq!(config.total_seconds(), 300);
    }

    #[test]
    fn test_total_seconds() {
        assert_eq!(TimerConfig::new(5, 30).total_seconds(), 330);
        assert_eq!(TimerConfig::new(0, 1).total_seconds(), 1);
    }

    #[test]
    fn test_from_total_seconds() {
        assert_eq!(TimerConfig::from_total_seconds(330), TimerConfig::new(5, 30));
        assert_eq!(TimerConfig::from_total_seconds(125), TimerConfig::new(2, 5));
    }

    #[test]
    fn test_validate() {
        assert!(TimerConfig::new(5, 30).validate().is_ok());
        assert!(TimerConfig::new(0, 59).validate().is_ok());
        assert!(TimerConfig::new(1, 60).validate().is_err());
        assert!(TimerConfig::new(0, 0).validate().is_err());
    }

    #[test]
    fn test_checked_total_seconds() {
        assert_eq!(TimerConfig::new(2, 5).checked_total_seconds().unwrap(), 125);
        assert!(matches!(
            TimerConfig::new(0, 0).checked_total_seconds(),
            Err(Error::InvalidTimerConfig(_))
        ));
    }

    #[test]
    fn test_camel_case_fields() {
        let config: TimerConfig =
            serde_json::from_str(r#"{"durationMinutes":10,"durationSeconds":30}"#).unwrap();
        assert_eq!(config, TimerConfig::new(10, 30));
    }
}
