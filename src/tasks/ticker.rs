//! Countdown polling loop

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

use crate::timer::WeakTimerEngine;

/// Background task that drives one running segment of the countdown
///
/// The loop only holds a weak handle and exits as soon as the engine is gone
/// or its generation has been retired by pause/reset/set_duration.
pub async fn ticker_task(engine: WeakTimerEngine, generation: u64, period: Duration) {
    debug!("Starting polling loop (generation {}, every {:?})", generation, period);

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        let Some(engine) = engine.upgrade() else {
            debug!("Engine dropped, polling loop exiting");
            break;
        };
        if !engine.poll_generation(generation) {
            break;
        }
    }

    debug!("Polling loop generation {} stopped", generation);
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use crate::{
        state::TimerStatus,
        timer::{EngineOptions, EventKind, ManualClock, TimerEngine, TimerEvent},
    };

    use super::*;

    fn engine(duration: u32) -> (TimerEngine, ManualClock) {
        let clock = ManualClock::default();
        let engine = TimerEngine::with_options(
            duration,
            None,
            EngineOptions {
                clock: Arc::new(clock.clone()),
                poll_interval: Duration::from_millis(100),
            },
        )
        .unwrap();
        (engine, clock)
    }

    fn tick_counter(engine: &TimerEngine) -> Arc<Mutex<Vec<i64>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        engine.on(EventKind::Tick, move |event| {
            if let TimerEvent::Tick(state) = event {
                sink.lock().unwrap().push(state.remaining_seconds);
            }
        });
        seen
    }

    /// Move both the wall clock and tokio's paused clock forward
    async fn step(clock: &ManualClock, millis: u64) {
        clock.advance_millis(millis as i64);
        tokio::time::advance(Duration::from_millis(millis)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_delivers_ticks_while_running() {
        let (engine, clock) = engine(5);
        let ticks = tick_counter(&engine);
        engine.start();
        tokio::task::yield_now().await;

        for _ in 0..25 {
            step(&clock, 100).await;
        }

        assert_eq!(*ticks.lock().unwrap(), vec![4, 3]);
        assert_eq!(engine.get_state().status, TimerStatus::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_loop_fires_nothing() {
        let (engine, clock) = engine(5);
        let ticks = tick_counter(&engine);
        engine.start();
        tokio::task::yield_now().await;

        for _ in 0..15 {
            step(&clock, 100).await;
        }
        engine.pause();
        for _ in 0..30 {
            step(&clock, 100).await;
        }

        assert_eq!(*ticks.lock().unwrap(), vec![4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_starts_a_fresh_loop() {
        let (engine, clock) = engine(5);
        let ticks = tick_counter(&engine);
        engine.start();
        tokio::task::yield_now().await;

        for _ in 0..15 {
            step(&clock, 100).await;
        }
        engine.pause();
        step(&clock, 5_000).await;
        engine.resume();
        tokio::task::yield_now().await;
        for _ in 0..15 {
            step(&clock, 100).await;
        }

        assert_eq!(*ticks.lock().unwrap(), vec![4, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_when_engine_dropped() {
        let (engine, clock) = engine(5);
        let weak = engine.downgrade();
        engine.start();
        drop(engine);

        step(&clock, 200).await;
        assert!(weak.upgrade().is_none());
    }
}
