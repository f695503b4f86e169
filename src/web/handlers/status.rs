// Status and debug handlers

use std::collections::BTreeMap;

use axum::{extract::State, response::Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::settings::WindowSettings;
use crate::transients::Transient;
use crate::web::handlers::common::{internal_error, ApiResponse, ApiResult};
use crate::web::AppState;
use crate::window::WindowState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub maintenance_active: bool,
    pub state: WindowState,
    pub window: WindowSettings,
    pub server_time: String,
}

pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusResponse> {
    let window = state
        .settings
        .window()
        .await
        .map_err(|e| internal_error(format!("Failed to load window settings: {}", e)))?;
    let window_state = state.evaluator.current_state().await;

    Ok(Json(ApiResponse::success(StatusResponse {
        maintenance_active: window_state.is_active(),
        state: window_state,
        window,
        server_time: Utc::now().to_rfc3339(),
    })))
}

pub async fn get_debug_info(State(state): State<AppState>) -> ApiResult<Value> {
    let window = state
        .settings
        .window()
        .await
        .map_err(|e| internal_error(format!("Failed to load window settings: {}", e)))?;
    let languages = state
        .settings
        .languages()
        .await
        .map_err(|e| internal_error(format!("Failed to load languages: {}", e)))?;
    let window_state = state.evaluator.current_state().await;
    let resolved_message = state
        .messages
        .resolve(None, None)
        .await
        .map_err(|e| internal_error(format!("Failed to resolve message: {}", e)))?;

    let cached: BTreeMap<String, Transient> =
        state.transients.snapshot().await.into_iter().collect();

    Ok(Json(ApiResponse::success(json!({
        "state": window_state,
        "window": window,
        "languages": languages,
        "resolved_message": resolved_message,
        "cached_facts": cached,
        "server_time": Utc::now().to_rfc3339(),
        "site_name": state.config.site_name,
    }))))
}
