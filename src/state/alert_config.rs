//! Alert point configuration

use serde::{Deserialize, Serialize};

use super::SoundType;
use crate::error::{Error, Result};

/// Remaining-time threshold bound to a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPoint {
    pub seconds: u32,
    #[serde(alias = "soundId")]
    pub sound_type: SoundType,
}

impl AlertPoint {
    pub fn new(seconds: u32, sound_type: SoundType) -> Self {
        Self { seconds, sound_type }
    }
}

/// Alert settings: master switch, volume and the ordered alert points
///
/// Points are kept sorted by `seconds` in descending order and are unique by
/// `seconds`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub enabled: bool,
    pub volume: f32,
    pub points: Vec<AlertPoint>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.8,
            points: vec![
                AlertPoint::new(60, SoundType::Gong),
                AlertPoint::new(0, SoundType::Gong),
            ],
        }
    }
}

impl AlertConfig {
    /// Build a validated config, collapsing duplicate seconds (last one wins)
    pub fn new(enabled: bool, volume: f32, points: Vec<AlertPoint>) -> Result<Self> {
        let config = points.into_iter().fold(
            Self { enabled, volume, points: Vec::new() },
            |config, point| config.add_point(point),
        );
        config.validate()?;
        Ok(config)
    }

    /// Check volume range and point uniqueness
    pub fn validate(&self) -> Result<()> {
        if !self.volume.is_finite() || !(0.0..=1.0).contains(&self.volume) {
            return Err(Error::InvalidAlertConfig(format!(
                "volume {} is outside 0.0..=1.0",
                self.volume
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for point in &self.points {
            if !seen.insert(point.seconds) {
                return Err(Error::InvalidAlertConfig(format!(
                    "duplicate alert point at {} seconds",
                    point.seconds
                )));
            }
        }

        Ok(())
    }

    /// Add a point, replacing any point with the same seconds
    pub fn add_point(mut self, point: AlertPoint) -> Self {
        self.points.retain(|p| p.seconds != point.seconds);
        self.points.push(point);
        self.points.sort_by(|a, b| b.seconds.cmp(&a.seconds));
        self
    }

    pub fn remove_point(mut self, seconds: u32) -> Self {
        self.points.retain(|p| p.seconds != seconds);
        self
    }

    /// Change the sound of an existing point; unknown seconds are ignored
    pub fn update_point_sound(mut self, seconds: u32, sound_type: SoundType) -> Self {
        if let Some(point) = self.points.iter_mut().find(|p| p.seconds == seconds) {
            point.sound_type = sound_type;
        }
        self
    }

    /// Set the volume, clamped to 0.0..=1.0
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Look up the point configured at `seconds`
    pub fn point(&self, seconds: u32) -> Option<&AlertPoint> {
        self.points.iter().find(|p| p.seconds == seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seconds_of(config: &AlertConfig) -> Vec<u32> {
        config.points.iter().map(|p| p.seconds).collect()
    }

    #[test]
    fn test_default_config() {
        let config = AlertConfig::default();
        assert!(config.enabled);
        assert_eq!(config.volume, 0.8);
        assert_eq!(
            config.points,
            vec![AlertPoint::new(60, SoundType::Gong), AlertPoint::new(0, SoundType::Gong)]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_add_point_sorts_descending() {
        let config = AlertConfig::default().add_point(AlertPoint::new(30, SoundType::Bell));
        assert_eq!(seconds_of(&config), vec![60, 30, 0]);
    }

    #[test]
    fn test_add_point_replaces_same_seconds() {
        let config = AlertConfig::default().add_point(AlertPoint::new(60, SoundType::Bell));
        assert_eq!(seconds_of(&config), vec![60, 0]);
        assert_eq!(config.point(60).unwrap().sound_type, SoundType::Bell);
    }

    #[test]
    fn test_remove_point() {
        let config = AlertConfig::default().remove_point(60);
        assert_eq!(seconds_of(&config), vec![0]);

        let unchanged = AlertConfig::default().remove_point(45);
        assert_eq!(unchanged, AlertConfig::default());
    }

    #[test]
    fn test_update_point_sound_only_touches_target() {
        let config = AlertConfig::default().update_point_sound(0, SoundType::Bell);
        assert_eq!(config.point(0).unwrap().sound_type, SoundType::Bell);
        assert_eq!(config.point(60).unwrap().sound_type, SoundType::Gong);

        let missing = AlertConfig::default().update_point_sound(15, SoundType::Bell);
        assert_eq!(missing, AlertConfig::default());
    }

    #[test]
    fn test_with_volume_clamps() {
        assert_eq!(AlertConfig::default().with_volume(0.5).volume, 0.5);
        assert_eq!(AlertConfig::default().with_volume(-0.5).volume, 0.0);
        assert_eq!(AlertConfig::default().with_volume(1.5).volume, 1.0);
    }

    #[test]
    fn test_with_enabled() {
        assert!(!AlertConfig::default().with_enabled(false).enabled);
    }

    #[test]
    fn test_new_collapses_duplicates_last_wins() {
        let config = AlertConfig::new(
            true,
            0.5,
            vec![
                AlertPoint::new(60, SoundType::Gong),
                AlertPoint::new(0, SoundType::Gong),
                AlertPoint::new(60, SoundType::Bell),
            ],
        )
        .unwrap();
        assert_eq!(seconds_of(&config), vec![60, 0]);
        assert_eq!(config.point(60).unwrap().sound_type, SoundType::Bell);
    }

    #[test]
    fn test_validate_rejects_volume_out_of_range() {
        assert!(AlertConfig::new(true, 1.01, vec![]).is_err());
        assert!(AlertConfig::new(true, -0.1, vec![]).is_err());
        assert!(AlertConfig::new(true, f32::NAN, vec![]).is_err());
        assert!(AlertConfig::new(true, 0.0, vec![]).is_ok());
        assert!(AlertConfig::new(true, 1.0, vec![]).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = AlertConfig {
            enabled: true,
            volume: 0.8,
            points: vec![AlertPoint::new(10, SoundType::Bell), AlertPoint::new(10, SoundType::Gong)],
        };
        assert!(matches!(config.validate(), Err(Error::InvalidAlertConfig(_))));
    }

    #[test]
    fn test_deserialize_rejects_bad_points() {
        let negative = r#"{"enabled":true,"volume":0.8,"points":[{"seconds":-1,"soundType":"gong"}]}"#;
        assert!(serde_json::from_str::<AlertConfig>(negative).is_err());

        let fractional = r#"{"enabled":true,"volume":0.8,"points":[{"seconds":1.5,"soundType":"gong"}]}"#;
        assert!(serde_json::from_str::<AlertConfig>(fractional).is_err());

        let unknown = r#"{"enabled":true,"volume":0.8,"points":[{"seconds":1,"soundType":"horn"}]}"#;
        assert!(serde_json::from_str::<AlertConfig>(unknown).is_err());
    }

    #[test]
    fn test_deserialize_accepts_sound_id_alias() {
        let json = r#"{"enabled":true,"volume":0.8,"points":[{"seconds":30,"soundId":"bell"}]}"#;
        let config: AlertConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.points, vec![AlertPoint::new(30, SoundType::Bell)]);
    }
}
