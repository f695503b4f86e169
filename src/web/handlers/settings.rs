// Settings management handlers

use std::collections::BTreeMap;

use axum::{
    extract::State,
    response::Json,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::constants::keys;
use crate::settings::{LanguageSettings, WindowSettings};
use crate::web::handlers::common::{bad_request, internal_error, ApiResponse, ApiResult};
use crate::web::AppState;
use crate::window::WindowState;

pub async fn get_all_settings(State(state): State<AppState>) -> ApiResult<Value> {
    let records = state
        .settings
        .all()
        .await
        .map_err(|e| internal_error(format!("Failed to load settings: {}", e)))?;

    let map: BTreeMap<String, String> = records
        .into_iter()
        .map(|record| (record.key, record.value))
        .collect();

    Ok(Json(ApiResponse::success(json!({ "settings": map }))))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(payload): Json<BTreeMap<String, String>>,
) -> ApiResult<Value> {
    if payload.is_empty() {
        return Err(bad_request("No settings provided".to_string()));
    }

    if let Some(tz) = payload.get(keys::TIMEZONE) {
        if tz.parse::<Tz>().is_err() {
            return Err(bad_request(format!("Unknown timezone: {}", tz)));
        }
    }

    let saved = state
        .settings
        .save_many(&payload)
        .await
        .map_err(|e| internal_error(format!("Failed to save settings: {}", e)))?;

    info!("Saved {} settings", saved);
    Ok(Json(ApiResponse::success_with_message(
        json!({ "saved": saved }),
        "Settings updated".to_string(),
    )))
}

#[derive(Debug, Serialize)]
pub struct WindowSettingsResponse {
    #[serde(flatten)]
    pub window: WindowSettings,
    pub state: WindowState,
}

pub async fn get_window_settings(State(state): State<AppState>) -> ApiResult<WindowSettingsResponse> {
    let window = state
        .settings
        .window()
        .await
        .map_err(|e| internal_error(format!("Failed to load window settings: {}", e)))?;
    let window_state = state.evaluator.current_state().await;

    Ok(Json(ApiResponse::success(WindowSettingsResponse {
        window,
        state: window_state,
    })))
}

#[derive(Debug, Deserialize)]
pub struct UpdateWindowRequest {
    pub enabled: bool,
    pub start: Option<String>,
    pub end: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
}

pub async fn update_window_settings(
    State(state): State<AppState>,
    Json(payload): Json<UpdateWindowRequest>,
) -> ApiResult<WindowSettingsResponse> {
    if let Some(tz) = &payload.timezone {
        if tz.parse::<Tz>().is_err() {
            return Err(bad_request(format!("Unknown timezone: {}", tz)));
        }
    }

    let mut values = BTreeMap::new();
    values.insert(
        keys::ENABLED.to_string(),
        if payload.enabled { "1" } else { "0" }.to_string(),
    );
    values.insert(
        keys::START_TIME.to_string(),
        payload.start.unwrap_or_default(),
    );
    values.insert(keys::END_TIME.to_string(), payload.end.unwrap_or_default());
    if let Some(tz) = payload.timezone {
        values.insert(keys::TIMEZONE.to_string(), tz);
    }

    state
        .settings
        .save_many(&values)
        .await
        .map_err(|e| internal_error(format!("Failed to save window settings: {}", e)))?;

    let window = state
        .settings
        .window()
        .await
        .map_err(|e| internal_error(format!("Failed to load window settings: {}", e)))?;
    let window_state = state.evaluator.current_state().await;

    info!(
        "Maintenance window updated: enabled={} start={:?} end={:?} tz={}",
        window.enabled, window.start, window.end, window.timezone
    );

    Ok(Json(ApiResponse::success_with_message(
        WindowSettingsResponse {
            window,
            state: window_state,
        },
        "Maintenance window updated".to_string(),
    )))
}

pub async fn get_languages(State(state): State<AppState>) -> ApiResult<LanguageSettings> {
    let languages = state
        .settings
        .languages()
        .await
        .map_err(|e| internal_error(format!("Failed to load languages: {}", e)))?;

    Ok(Json(ApiResponse::success(languages)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateLanguagesRequest {
    /// language code -> display name
    pub configured: BTreeMap<String, String>,
    pub default_language: String,
}

pub async fn update_languages(
    State(state): State<AppState>,
    Json(payload): Json<UpdateLanguagesRequest>,
) -> ApiResult<LanguageSettings> {
    if payload.configured.is_empty() {
        return Err(bad_request("At least one language is required".to_string()));
    }
    if !payload.configured.contains_key(&payload.default_language) {
        return Err(bad_request(format!(
            "Default language {} is not in the configured list",
            payload.default_language
        )));
    }

    let configured = serde_json::to_string(&payload.configured)
        .map_err(|e| internal_error(format!("Failed to encode languages: {}", e)))?;

    let mut values = BTreeMap::new();
    values.insert(keys::CONFIGURED_LANGUAGES.to_string(), configured);
    values.insert(
        keys::DEFAULT_LANGUAGE.to_string(),
        payload.default_language.clone(),
    );

    state
        .settings
        .save_many(&values)
        .await
        .map_err(|e| internal_error(format!("Failed to save languages: {}", e)))?;

    let languages = state
        .settings
        .languages()
        .await
        .map_err(|e| internal_error(format!("Failed to load languages: {}", e)))?;

    Ok(Json(ApiResponse::success_with_message(
        languages,
        "Languages updated".to_string(),
    )))
}

pub async fn clear_cache(State(state): State<AppState>) -> ApiResult<Value> {
    let cleared = state.transients.clear().await;
    info!("Cleared {} cached entries", cleared);

    Ok(Json(ApiResponse::success_with_message(
        json!({ "cleared": cleared }),
        "Cache cleared".to_string(),
    )))
}
