//! Countdown state machine
//!
//! Elapsed time is always recomputed from `now - started_at`; the polling
//! loop only decides *when* to look at the clock, never how much time passed.
//! Each polling loop carries a generation number. Leaving `Running` bumps the
//! generation and aborts the loop, and every delivery re-checks the
//! generation, so a stopped loop cannot emit anything.

use std::{
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    clock::{Clock, SystemClock},
    events::{AlertEvent, EventKind, ListenerId, Listeners, TimerEvent},
    scheduler::AlertScheduler,
};
use crate::{
    error::{Error, Result},
    state::{AlertConfig, TimerState, TimerStatus},
    tasks::ticker_task,
};

/// Default delay between two polling-loop steps
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Construction options for [`TimerEngine`]
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub clock: Arc<dyn Clock>,
    pub poll_interval: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            clock: Arc::new(SystemClock),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Debug)]
struct Inner {
    state: TimerState,
    alert_config: AlertConfig,
    scheduler: AlertScheduler,
    /// Remaining seconds at the last delivered tick
    last_tick_second: i64,
    complete_fired: bool,
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl Inner {
    fn refresh(&mut self, now: DateTime<Utc>) {
        if !self.state.is_running() {
            return;
        }
        if let Some(started_at) = self.state.started_at {
            let millis = (now - started_at).num_milliseconds().max(0);
            self.state.set_elapsed((millis / 1000) as u64);
        }
    }

    fn stop_polling(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    /// Start a fresh run for the current duration
    fn reset_run(&mut self) {
        self.stop_polling();
        let duration = self.state.duration_seconds;
        self.state = TimerState::new(duration);
        self.scheduler.clear(duration);
        self.last_tick_second = i64::from(duration);
        self.complete_fired = false;
    }
}

#[derive(Debug)]
struct Shared {
    inner: Mutex<Inner>,
    listeners: Mutex<Listeners>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

/// Countdown engine handle
///
/// Clones share the same countdown. State transitions are synchronous and
/// never block on the polling loop.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    shared: Arc<Shared>,
}

/// Non-owning handle held by the polling loop
#[derive(Debug, Clone)]
pub struct WeakTimerEngine {
    shared: Weak<Shared>,
}

impl WeakTimerEngine {
    pub fn upgrade(&self) -> Option<TimerEngine> {
        self.shared.upgrade().map(|shared| TimerEngine { shared })
    }
}

impl TimerEngine {
    /// Create an idle engine using the system clock
    pub fn new(duration_seconds: u32, alert_config: Option<AlertConfig>) -> Result<Self> {
        Self::with_options(duration_seconds, alert_config, EngineOptions::default())
    }

    pub fn with_options(
        duration_seconds: u32,
        alert_config: Option<AlertConfig>,
        options: EngineOptions,
    ) -> Result<Self> {
        validate_duration(duration_seconds)?;
        let alert_config = alert_config.unwrap_or_default();
        alert_config.validate()?;

        let inner = Inner {
            state: TimerState::new(duration_seconds),
            alert_config,
            scheduler: AlertScheduler::new(duration_seconds),
            last_tick_second: i64::from(duration_seconds),
            complete_fired: false,
            generation: 0,
            ticker: None,
        };

        Ok(Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                listeners: Mutex::new(Listeners::default()),
                clock: options.clock,
                poll_interval: options.poll_interval,
            }),
        })
    }

    pub fn downgrade(&self) -> WeakTimerEngine {
        WeakTimerEngine {
            shared: Arc::downgrade(&self.shared),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn now(&self) -> DateTime<Utc> {
        self.shared.clock.now()
    }

    /// Replace the countdown with a fresh idle one, discarding any run in
    /// progress
    pub fn set_duration(&self, duration_seconds: u32) -> Result<()> {
        validate_duration(duration_seconds)?;

        let mut inner = self.lock();
        if inner.state.status != TimerStatus::Idle {
            info!(
                "Duration changed while {}, discarding current run",
                inner.state.status.as_str()
            );
        }
        inner.state.duration_seconds = duration_seconds;
        inner.reset_run();
        debug!("Duration set to {}s", duration_seconds);
        Ok(())
    }

    /// Idle -> Running; ignored in any other status
    pub fn start(&self) {
        let mut inner = self.lock();
        if inner.state.status != TimerStatus::Idle {
            debug!("start() ignored while {}", inner.state.status.as_str());
            return;
        }
        self.begin_running(&mut inner, self.now());
        info!("Timer started for {}s", inner.state.duration_seconds);
    }

    /// Running -> Paused; ignored in any other status
    pub fn pause(&self) {
        let mut inner = self.lock();
        if inner.state.status != TimerStatus::Running {
            debug!("pause() ignored while {}", inner.state.status.as_str());
            return;
        }
        let now = self.now();
        inner.refresh(now);
        inner.state.status = TimerStatus::Paused;
        inner.state.started_at = None;
        inner.stop_polling();
        info!("Timer paused at {}s elapsed", inner.state.elapsed_seconds);
    }

    /// Paused -> Running; ignored in any other status
    pub fn resume(&self) {
        let mut inner = self.lock();
        if inner.state.status != TimerStatus::Paused {
            debug!("resume() ignored while {}", inner.state.status.as_str());
            return;
        }
        let elapsed = inner.state.elapsed_seconds as i64;
        let started_at = self.now() - chrono::Duration::seconds(elapsed);
        self.begin_running(&mut inner, started_at);
        info!("Timer resumed at {}s elapsed", elapsed);
    }

    /// Back to idle at the current duration, from any status
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.reset_run();
        info!("Timer reset to {}s", inner.state.duration_seconds);
    }

    /// `reset()` followed by `start()` under a single lock
    pub fn restart(&self) {
        let mut inner = self.lock();
        inner.reset_run();
        self.begin_running(&mut inner, self.now());
        info!("Timer restarted for {}s", inner.state.duration_seconds);
    }

    fn begin_running(&self, inner: &mut Inner, started_at: DateTime<Utc>) {
        inner.state.status = TimerStatus::Running;
        inner.state.started_at = Some(started_at);
        inner.stop_polling();
        let generation = inner.generation;

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                inner.ticker = Some(runtime.spawn(ticker_task(
                    self.downgrade(),
                    generation,
                    self.shared.poll_interval,
                )));
            }
            Err(_) => {
                debug!("No tokio runtime, polling loop not started; call poll() manually");
            }
        }
    }

    /// Snapshot of the current state, recomputed from the clock when running
    pub fn get_state(&self) -> TimerState {
        let mut inner = self.lock();
        let now = self.now();
        inner.refresh(now);
        inner.state.clone()
    }

    pub fn get_remaining_time(&self) -> i64 {
        self.get_state().remaining_seconds
    }

    /// Replace the alert settings without touching the fired set
    pub fn set_alert_config(&self, alert_config: AlertConfig) -> Result<()> {
        alert_config.validate()?;
        let mut inner = self.lock();
        debug!(
            "Alert config updated: enabled={}, points={}",
            alert_config.enabled,
            alert_config.points.len()
        );
        inner.alert_config = alert_config;
        Ok(())
    }

    pub fn get_alert_config(&self) -> AlertConfig {
        self.lock().alert_config.clone()
    }

    /// Whether the alert at `seconds` already fired in the current run
    pub fn has_alert_fired(&self, seconds: u32) -> bool {
        self.lock().scheduler.has_fired(seconds)
    }

    /// Subscribe to one kind of notification
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&TimerEvent) + Send + Sync + 'static,
    {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on(kind, Arc::new(listener))
    }

    pub fn off(&self, id: ListenerId) -> bool {
        self.shared
            .listeners
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .off(id)
    }

    /// One polling step: recompute from the clock and deliver any notifications
    /// due since the previous step
    pub fn poll(&self) {
        let generation = self.lock().generation;
        self.poll_generation(generation);
    }

    /// Poll on behalf of the loop identified by `generation`; returns false
    /// once that loop has been retired
    pub(crate) fn poll_generation(&self, generation: u64) -> bool {
        let events = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return false;
            }
            if !inner.state.is_running() {
                return true;
            }

            let now = self.now();
            inner.refresh(now);

            let current = inner.state.remaining_seconds;
            if current == inner.last_tick_second {
                return true;
            }
            let previous = std::mem::replace(&mut inner.last_tick_second, current);

            let mut events = vec![TimerEvent::Tick(inner.state.clone())];

            let Inner {
                scheduler,
                alert_config,
                ..
            } = &mut *inner;
            let due = scheduler.observe(&alert_config.points, current);
            if alert_config.enabled {
                events.extend(due.into_iter().map(|point| {
                    TimerEvent::Alert(AlertEvent {
                        remaining_seconds: current,
                        seconds: point.seconds,
                        sound_type: point.sound_type,
                    })
                }));
            } else if !due.is_empty() {
                debug!("Alerts disabled, suppressing {} alert(s)", due.len());
            }

            if !inner.complete_fired && previous > 0 && current <= 0 {
                inner.complete_fired = true;
                events.push(TimerEvent::Complete(inner.state.clone()));
            }

            events
        };

        self.dispatch(generation, events);
        true
    }

    /// Deliver `events` in order, stopping as soon as `generation` is
    /// retired. The check runs before every listener call, so a `pause()` or
    /// `reset()` from another thread cuts delivery off between two listeners.
    fn dispatch(&self, generation: u64, events: Vec<TimerEvent>) {
        for event in events {
            let listeners = self
                .shared
                .listeners
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .for_kind(event.kind());
            for listener in listeners {
                if self.lock().generation != generation {
                    debug!("Polling loop retired mid-delivery, dropping remaining events");
                    return;
                }
                listener(&event);
            }
        }
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}

fn validate_duration(duration_seconds: u32) -> Result<()> {
    if duration_seconds == 0 {
        warn!("Rejected zero-length duration");
        return Err(Error::InvalidDuration(0));
    }
    Ok(())
}
