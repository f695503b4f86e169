// Public maintenance page

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tracing::error;

use crate::web::handlers::common::PreviewQuery;
use crate::web::AppState;
use crate::window::WindowState;

const NO_STORE: &str = "no-cache, no-store, must-revalidate";

pub async fn maintenance_page(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    headers: HeaderMap,
) -> Response {
    let preview = is_preview_request(&state, &query);
    let active = state.evaluator.should_show_maintenance().await;

    if !active && !preview {
        return (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-cache")],
            Html(format!(
                "<!DOCTYPE html><html><head><title>{}</title></head><body><p>{} is up and running.</p></body></html>",
                state.config.site_name, state.config.site_name
            )),
        )
            .into_response();
    }

    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());

    let body = match render_page(&state, query.lang.as_deref(), accept_language, preview).await {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to render maintenance page: {}", e);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CACHE_CONTROL, NO_STORE)],
                Html(
                    "<!DOCTYPE html><html><head><title>Maintenance</title></head><body><h1>Site Under Maintenance</h1></body></html>"
                        .to_string(),
                ),
            )
                .into_response();
        }
    };

    // Preview outside an active window renders the page without the outage status
    if preview && !active {
        return (
            StatusCode::OK,
            [(header::CACHE_CONTROL, "no-cache")],
            Html(body),
        )
            .into_response();
    }

    let retry_after = retry_after_seconds(&state).await;
    (
        StatusCode::SERVICE_UNAVAILABLE,
        [
            (header::CACHE_CONTROL, NO_STORE.to_string()),
            (header::RETRY_AFTER, retry_after.to_string()),
        ],
        Html(body),
    )
        .into_response()
}

fn is_preview_request(state: &AppState, query: &PreviewQuery) -> bool {
    if query.preview.as_deref() != Some("1") {
        return false;
    }
    match &state.config.preview_token {
        Some(expected) => query.token.as_deref() == Some(expected.as_str()),
        None => true,
    }
}

async fn retry_after_seconds(state: &AppState) -> i64 {
    match state.evaluator.current_state().await {
        WindowState::Active { ends_at } => (ends_at - Utc::now()).num_seconds().max(0),
        _ => 3600,
    }
}

async fn render_page(
    state: &AppState,
    requested_lang: Option<&str>,
    accept_language: Option<&str>,
    preview: bool,
) -> anyhow::Result<String> {
    let message = state.messages.resolve(requested_lang, accept_language).await?;
    let display = state.settings.display().await?;
    let window = state.settings.window().await?;

    let end_timestamp = match state.evaluator.current_state().await {
        WindowState::Active { ends_at } => Some(ends_at.timestamp()),
        _ => None,
    };

    let mut context = tera::Context::new();
    context.insert("site_name", &state.config.site_name);
    context.insert("language", &message.language);
    context.insert("heading", &message.heading);
    context.insert("description", &message.description);
    context.insert("countdown_label", &message.countdown_label);
    context.insert("show_countdown", &display.show_countdown);
    context.insert("show_image", &display.show_image);
    context.insert("image_url", &display.image_url);
    context.insert("end_timestamp", &end_timestamp);
    context.insert("timezone", &window.timezone);
    context.insert("preview", &preview);

    let body = state.templates.render("maintenance.tera", &context)?;
    Ok(body)
}
