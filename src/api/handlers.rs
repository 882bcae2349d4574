//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info, warn};

use crate::{
    error::Error,
    state::{AlertConfig, AppState, SoundType, TimerConfig, TimerState},
};
use super::responses::{
    AlertResponse, ApiResponse, ErrorResponse, HealthResponse, StatusResponse, TimerResponse,
};

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(e: Error) -> HandlerError {
    if e.is_validation() {
        warn!("Rejected request: {}", e);
        (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::new(e.to_string())))
    } else {
        error!("Request failed: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.to_string())))
    }
}

fn intent_response(action: &str, state: TimerState) -> Json<ApiResponse> {
    info!("{} endpoint called - timer is {}", action, state.status.as_str());
    Json(ApiResponse::ok(format!("{} handled", action), state))
}

/// Handle POST /timer/start
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    intent_response("Start", state.start())
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    intent_response("Pause", state.pause())
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    intent_response("Resume", state.resume())
}

/// Handle POST /timer/reset
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    intent_response("Reset", state.reset())
}

/// Handle POST /timer/restart
pub async fn restart_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    intent_response("Restart", state.restart())
}

/// Handle GET /timer - Current countdown snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerResponse> {
    Json(state.engine.get_state().into())
}

/// Handle PUT /timer/duration - Store and apply a new duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(config): Json<TimerConfig>,
) -> Result<Json<ApiResponse>, HandlerError> {
    let timer = state.set_timer_config(config).map_err(reject)?;
    Ok(Json(ApiResponse::ok(
        format!(
            "Duration set to {}m {}s",
            config.duration_minutes, config.duration_seconds
        ),
        timer,
    )))
}

/// Handle GET /alerts
pub async fn get_alerts_handler(State(state): State<Arc<AppState>>) -> Json<AlertResponse> {
    Json(AlertResponse {
        status: "ok".to_string(),
        alerts: state.engine.get_alert_config(),
        audio_ready: state.audio.is_initialized(),
    })
}

/// Handle PUT /alerts - Store and apply alert settings
///
/// Duplicate points collapse to the last one given.
pub async fn put_alerts_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AlertConfig>,
) -> Result<Json<AlertResponse>, HandlerError> {
    let config = AlertConfig::new(body.enabled, body.volume, body.points).map_err(reject)?;
    let alerts = state.set_alert_config(config).map_err(reject)?;
    Ok(Json(AlertResponse {
        status: "ok".to_string(),
        alerts,
        audio_ready: state.audio.is_initialized(),
    }))
}

/// Handle POST /alerts/preview/:sound
pub async fn preview_handler(
    State(state): State<Arc<AppState>>,
    Path(sound): Path<String>,
) -> Result<StatusCode, HandlerError> {
    let sound: SoundType = sound.parse().map_err(|e: Error| {
        warn!("Preview requested for unknown sound: {}", e);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.to_string())))
    })?;
    state.preview_sound(sound);
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /status - Return current timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.engine.get_state().into(),
        alerts: state.engine.get_alert_config(),
        audio_ready: state.audio.is_initialized(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
