// Per-language maintenance message handlers

use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::database::MessageRecord;
use crate::web::handlers::common::{bad_request, internal_error, not_found, ApiResponse, ApiResult};
use crate::web::AppState;

pub async fn get_all_messages(State(state): State<AppState>) -> ApiResult<Vec<MessageRecord>> {
    let messages = state
        .database
        .get_all_messages()
        .await
        .map_err(|e| internal_error(format!("Failed to load messages: {}", e)))?;

    Ok(Json(ApiResponse::success(messages)))
}

pub async fn get_message(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> ApiResult<MessageRecord> {
    let message = state
        .database
        .get_message(&language)
        .await
        .map_err(|e| internal_error(format!("Failed to load message: {}", e)))?
        .ok_or_else(|| not_found(format!("No message for language {}", language)))?;

    Ok(Json(ApiResponse::success(message)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    pub heading: String,
    pub description: String,
    #[serde(default)]
    pub countdown_label: Option<String>,
}

pub async fn update_message(
    State(state): State<AppState>,
    Path(language): Path<String>,
    Json(payload): Json<UpdateMessageRequest>,
) -> ApiResult<MessageRecord> {
    let language = language.trim().to_lowercase();
    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(bad_request(format!("Invalid language code: {}", language)));
    }
    if payload.heading.trim().is_empty() {
        return Err(bad_request("Heading must not be empty".to_string()));
    }

    let record = MessageRecord {
        language: language.clone(),
        heading: payload.heading,
        description: payload.description,
        countdown_label: payload
            .countdown_label
            .unwrap_or_else(|| crate::constants::defaults::COUNTDOWN_LABEL.to_string()),
        updated_at: Utc::now(),
    };

    state
        .database
        .upsert_message(&record)
        .await
        .map_err(|e| internal_error(format!("Failed to save message: {}", e)))?;

    info!("Saved maintenance message for language {}", language);
    Ok(Json(ApiResponse::success_with_message(
        record,
        format!("Message for {} saved", language),
    )))
}

pub async fn delete_message(
    State(state): State<AppState>,
    Path(language): Path<String>,
) -> ApiResult<serde_json::Value> {
    let deleted = state
        .database
        .delete_message(&language)
        .await
        .map_err(|e| internal_error(format!("Failed to delete message: {}", e)))?;

    if !deleted {
        return Err(not_found(format!("No message for language {}", language)));
    }

    info!("Deleted maintenance message for language {}", language);
    Ok(Json(ApiResponse::success_with_message(
        serde_json::json!({ "language": language }),
        "Message deleted".to_string(),
    )))
}
