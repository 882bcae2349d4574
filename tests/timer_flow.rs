//! End-to-end countdown flows driven through the public engine API
//!
//! Covers a full presentation run: configure, start, pause/resume, alerts,
//! completion, overtime and restart.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use presentation_timer::{
    services::{migrate_alert_config, SettingsStore},
    timer::{EngineOptions, EventKind, ManualClock, TimerEngine, TimerEvent},
    AlertConfig, AlertPoint, SoundType, TimerConfig, TimerState, TimerStatus,
};
use serde_json::json;

fn engine(duration: u32, alerts: Option<AlertConfig>) -> (TimerEngine, ManualClock) {
    let clock = ManualClock::default();
    let engine = TimerEngine::with_options(
        duration,
        alerts,
        EngineOptions {
            clock: Arc::new(clock.clone()),
            poll_interval: Duration::from_millis(100),
        },
    )
    .expect("valid engine");
    (engine, clock)
}

fn record_all(engine: &TimerEngine) -> Arc<Mutex<Vec<TimerEvent>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    for kind in [EventKind::Tick, EventKind::Alert, EventKind::Complete] {
        let sink = Arc::clone(&seen);
        engine.on(kind, move |event| sink.lock().unwrap().push(event.clone()));
    }
    seen
}

/// Advance in 100ms steps, polling like the background loop would
fn run_for(engine: &TimerEngine, clock: &ManualClock, millis: i64) {
    for _ in 0..millis / 100 {
        clock.advance_millis(100);
        engine.poll();
    }
}

#[test]
fn test_full_presentation_run() {
    let alerts = AlertConfig::new(
        true,
        0.8,
        vec![AlertPoint::new(3, SoundType::Bell), AlertPoint::new(0, SoundType::Gong)],
    )
    .unwrap();
    let (engine, clock) = engine(5, Some(alerts));
    let events = record_all(&engine);

    engine.start();
    run_for(&engine, &clock, 1_500);
    engine.pause();
    assert_eq!(engine.get_state().elapsed_seconds, 1);

    clock.advance_millis(30_000);
    engine.resume();
    run_for(&engine, &clock, 6_000);

    let state = engine.get_state();
    assert_eq!(state.status, TimerStatus::Running);
    assert_eq!(state.elapsed_seconds, 7);
    assert_eq!(state.remaining_seconds, -2);

    let events = events.lock().unwrap();
    let alerts: Vec<(u32, SoundType)> = events
        .iter()
        .filter_map(|e| match e {
            TimerEvent::Alert(a) => Some((a.seconds, a.sound_type)),
            _ => None,
        })
        .collect();
    assert_eq!(alerts, vec![(3, SoundType::Bell), (0, SoundType::Gong)]);

    let completes = events.iter().filter(|e| e.kind() == EventKind::Complete).count();
    assert_eq!(completes, 1);

    let ticks: Vec<i64> = events
        .iter()
        .filter_map(|e| match e {
            TimerEvent::Tick(s) => Some(s.remaining_seconds),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1, 0, -1, -2]);
}

#[test]
fn test_remaining_invariant_holds_throughout() {
    let (engine, clock) = engine(10, None);
    engine.start();
    for _ in 0..150 {
        clock.advance_millis(100);
        engine.poll();
        let state = engine.get_state();
        assert_eq!(
            state.remaining_seconds,
            i64::from(state.duration_seconds) - state.elapsed_seconds as i64
        );
        assert!(state.started_at.is_some());
    }
}

#[test]
fn test_restart_after_completion_fires_again() {
    let (engine, clock) = engine(2, None);
    let events = record_all(&engine);

    engine.start();
    run_for(&engine, &clock, 3_000);
    engine.restart();
    assert_eq!(engine.get_state().remaining_seconds, 2);
    run_for(&engine, &clock, 3_000);

    let completes = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.kind() == EventKind::Complete)
        .count();
    assert_eq!(completes, 2);
}

#[test]
fn test_set_duration_mid_run_starts_over() {
    let (engine, clock) = engine(60, None);
    engine.start();
    run_for(&engine, &clock, 5_000);

    engine.set_duration(TimerConfig::new(2, 5).checked_total_seconds().unwrap()).unwrap();
    assert_eq!(engine.get_state(), TimerState::new(125));

    engine.start();
    run_for(&engine, &clock, 1_000);
    assert_eq!(engine.get_remaining_time(), 124);
}

#[test]
fn test_stored_legacy_config_drives_engine() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        json!({
            "presentation-timer:config": {"durationMinutes": 2, "durationSeconds": 0},
            "presentation-timer:alert": {"enabled": true, "volume": 0.5, "points": [60, 0]}
        })
        .to_string(),
    )
    .unwrap();

    let store = SettingsStore::new(&path);
    let alerts = store.load_alert_config();
    let duration = store.load_timer_config().checked_total_seconds().unwrap();
    assert_eq!(duration, 120);

    let (engine, clock) = engine(duration, Some(alerts));
    let events = record_all(&engine);
    engine.start();
    clock.advance_millis(58_000);
    engine.poll();
    clock.advance_millis(4_000);
    engine.poll();

    let alert_count = events
        .lock()
        .unwrap()
        .iter()
        .filter(|e| e.kind() == EventKind::Alert)
        .count();
    assert_eq!(alert_count, 1);
}

#[test]
fn test_migration_round_trip() {
    let migrated = migrate_alert_config(json!({"enabled": true, "volume": 0.8, "points": [60, 0]}));
    let config: AlertConfig = serde_json::from_value(migrated.clone()).unwrap();
    assert_eq!(
        config.points,
        vec![AlertPoint::new(60, SoundType::Gong), AlertPoint::new(0, SoundType::Gong)]
    );
    assert_eq!(migrate_alert_config(migrated.clone()), migrated);
}
