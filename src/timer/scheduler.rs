//! Alert point scheduling
//!
//! The scheduler remembers the last remaining-time value it saw and which
//! thresholds already fired in the current run. A threshold is due when the
//! countdown passes through it on the way down, i.e. `previous > seconds` and
//! `current <= seconds`. Comparing against the previous observation keeps a
//! delayed poll (62 -> 58) from skipping the 60-second point.

use std::collections::BTreeSet;

use crate::state::AlertPoint;

#[derive(Debug, Clone)]
pub struct AlertScheduler {
    fired: BTreeSet<u32>,
    last_observed: i64,
}

impl AlertScheduler {
    /// Create a scheduler for a run starting at `duration_seconds` remaining
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            fired: BTreeSet::new(),
            last_observed: i64::from(duration_seconds),
        }
    }

    /// Forget fired thresholds and start a new run
    pub fn clear(&mut self, duration_seconds: u32) {
        self.fired.clear();
        self.last_observed = i64::from(duration_seconds);
    }

    /// Record a new remaining-time observation and return the points that
    /// became due since the previous one, highest threshold first
    pub fn observe(&mut self, points: &[AlertPoint], remaining_seconds: i64) -> Vec<AlertPoint> {
        let previous = std::mem::replace(&mut self.last_observed, remaining_seconds);
        if remaining_seconds >= previous {
            return Vec::new();
        }

        let fired = &mut self.fired;
        let mut due: Vec<AlertPoint> = points
            .iter()
            .filter(|p| {
                let threshold = i64::from(p.seconds);
                previous > threshold && remaining_seconds <= threshold
            })
            .filter(|p| fired.insert(p.seconds))
            .copied()
            .collect();

        due.sort_by(|a, b| b.seconds.cmp(&a.seconds));
        due
    }

    pub fn has_fired(&self, seconds: u32) -> bool {
        self.fired.contains(&seconds)
    }

    #[cfg(test)]
    fn fired_count(&self) -> usize {
        self.fired.len()
    }

    #[cfg(test)]
    fn last_observed(&self) -> i64 {
        self.last_observed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SoundType;

    fn points(list: &[(u32, SoundType)]) -> Vec<AlertPoint> {
        list.iter().map(|&(s, t)| AlertPoint::new(s, t)).collect()
    }

    #[test]
    fn test_fires_when_crossing_threshold() {
        let pts = points(&[(60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(120);

        assert!(scheduler.observe(&pts, 61).is_empty());
        let due = scheduler.observe(&pts, 60);
        assert_eq!(due, pts);
        assert!(scheduler.has_fired(60));
    }

    #[test]
    fn test_jump_over_threshold_still_fires() {
        let pts = points(&[(60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(120);

        scheduler.observe(&pts, 62);
        let due = scheduler.observe(&pts, 58);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].seconds, 60);
    }

    #[test]
    fn test_each_point_fires_once_per_run() {
        let pts = points(&[(60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(120);

        assert_eq!(scheduler.observe(&pts, 60).len(), 1);
        assert!(scheduler.observe(&pts, 59).is_empty());
        assert!(scheduler.observe(&pts, 0).is_empty());
        assert_eq!(scheduler.fired_count(), 1);
    }

    #[test]
    fn test_multiple_points_in_one_jump_are_ordered() {
        let pts = points(&[(0, SoundType::Gong), (30, SoundType::Bell), (60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(90);

        let due = scheduler.observe(&pts, -5);
        let seconds: Vec<u32> = due.iter().map(|p| p.seconds).collect();
        assert_eq!(seconds, vec![60, 30, 0]);
    }

    #[test]
    fn test_points_at_or_above_duration_never_fire() {
        let pts = points(&[(300, SoundType::Bell), (120, SoundType::Bell)]);
        let mut scheduler = AlertScheduler::new(120);

        assert!(scheduler.observe(&pts, 119).is_empty());
        assert!(scheduler.observe(&pts, -10).is_empty());
        assert_eq!(scheduler.fired_count(), 0);
    }

    #[test]
    fn test_clear_rearms_points() {
        let pts = points(&[(60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(120);
        scheduler.observe(&pts, 50);
        assert!(scheduler.has_fired(60));

        scheduler.clear(120);
        assert_eq!(scheduler.fired_count(), 0);
        assert_eq!(scheduler.last_observed(), 120);
        assert_eq!(scheduler.observe(&pts, 59).len(), 1);
    }

    #[test]
    fn test_non_decreasing_observation_is_ignored() {
        let pts = points(&[(60, SoundType::Gong)]);
        let mut scheduler = AlertScheduler::new(120);
        scheduler.observe(&pts, 70);
        assert!(scheduler.observe(&pts, 70).is_empty());
        assert_eq!(scheduler.last_observed(), 70);
    }
}
