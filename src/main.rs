//! Presentation Timer - A countdown timer service for presentations
//!
//! This is the main entry point for the presentation-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use presentation_timer::{
    config::Config,
    services::{AudioPlayer, RodioPlayer, SettingsStore},
    state::AppState,
    api::create_router,
    tasks::register_timer_listeners,
    timer::{EngineOptions, TimerEngine},
    utils::shutdown_signal,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("presentation_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting presentation-timer server v{}", env!("CARGO_PKG_VERSION"));

    // Load stored settings, letting command line flags override the duration
    let store = SettingsStore::new(config.settings_path());
    info!("Settings file: {}", store.path().display());

    let mut timer_config = store.load_timer_config();
    if let Some(cli_config) = config.timer_config(timer_config) {
        timer_config = cli_config;
        if let Err(e) = store.save_timer_config(&timer_config) {
            warn!("Failed to store duration from command line: {}", e);
        }
    }
    let alert_config = store.load_alert_config();
    let duration = timer_config.checked_total_seconds()?;

    info!(
        "Configuration: host={}, port={}, duration={}m {}s, alerts={}",
        config.host,
        config.port,
        timer_config.duration_minutes,
        timer_config.duration_seconds,
        alert_config.enabled
    );

    let engine = TimerEngine::with_options(
        duration,
        Some(alert_config.clone()),
        EngineOptions {
            poll_interval: config.poll_interval(),
            ..EngineOptions::default()
        },
    )?;

    // Audio stays locked until the first user intent arrives
    let audio: Arc<dyn AudioPlayer> = Arc::new(RodioPlayer::new(alert_config.volume));
    register_timer_listeners(&engine, Arc::clone(&audio));

    let state = Arc::new(AppState::new(
        engine,
        store,
        audio,
        config.port,
        config.host.clone(),
    ));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start|pause|resume|reset|restart - Timer intents");
    info!("  GET  /timer                  - Current countdown");
    info!("  PUT  /timer/duration         - Set duration");
    info!("  GET  /alerts, PUT /alerts    - Alert settings");
    info!("  POST /alerts/preview/:sound  - Preview a sound");
    info!("  GET  /status                 - Timer and server status");
    info!("  GET  /health                 - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
