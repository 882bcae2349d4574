//! Listeners that turn timer notifications into sound and log output

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    services::AudioPlayer,
    timer::{format_elapsed, EventKind, ListenerId, TimerEngine, TimerEvent},
};

/// Wire the audio player and logging to the engine's notifications
///
/// Alerts are played only when the alert config is enabled and the audio
/// output has been initialized by a user interaction.
pub fn register_timer_listeners(engine: &TimerEngine, audio: Arc<dyn AudioPlayer>) -> Vec<ListenerId> {
    let weak = engine.downgrade();
    let alert_id = engine.on(EventKind::Alert, move |event| {
        let TimerEvent::Alert(alert) = event else {
            return;
        };
        info!(
            "Alert at {} remaining ({}s point, {})",
            format_elapsed(alert.remaining_seconds),
            alert.seconds,
            alert.sound_type
        );

        let Some(engine) = weak.upgrade() else {
            return;
        };
        if !engine.get_alert_config().enabled {
            debug!("Alerts disabled, not playing {}", alert.sound_type);
            return;
        }
        if !audio.is_initialized() {
            warn!("Audio not initialized yet, alert at {}s not played", alert.seconds);
            return;
        }
        audio.play(alert.sound_type);
    });

    let tick_id = engine.on(EventKind::Tick, |event| {
        if let TimerEvent::Tick(state) = event {
            debug!("{} {}", state.status.as_str(), format_elapsed(state.remaining_seconds));
        }
    });

    let complete_id = engine.on(EventKind::Complete, |_| {
        info!("Countdown complete, continuing into overtime");
    });

    vec![alert_id, tick_id, complete_id]
}
