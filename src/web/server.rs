use crate::config::Config;
use crate::database::Database;
use crate::services::MessageService;
use crate::settings::SettingsStore;
use crate::transients::TransientStore;
use crate::web::{handlers, AppState};
use crate::window::WindowEvaluator;
use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tera::Tera;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn load_templates(template_dir: &str) -> Result<Tera> {
    let pattern = format!("{}/*.tera", template_dir.trim_end_matches('/'));
    Tera::new(&pattern).with_context(|| format!("failed to load templates from {}", pattern))
}

#[allow(clippy::too_many_arguments)]
pub async fn start_web_server(
    config: Arc<Config>,
    database: Arc<Database>,
    settings: Arc<SettingsStore>,
    transients: Arc<TransientStore>,
    evaluator: Arc<WindowEvaluator>,
    messages: Arc<MessageService>,
    templates: Arc<Tera>,
) -> Result<()> {
    let state = AppState::new(
        config,
        database,
        settings,
        transients,
        evaluator,
        messages,
        templates,
    );

    let app = create_router(state.clone());
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // === PUBLIC ROUTES ===
        .route("/", get(handlers::maintenance_page))
        // === STATUS ROUTES ===
        .route("/api/status", get(handlers::get_status))
        .route("/api/debug", get(handlers::get_debug_info))
        // === SETTINGS ROUTES ===
        .route("/api/settings", get(handlers::get_all_settings))
        .route("/api/settings", put(handlers::update_settings))
        .route("/api/settings/window", get(handlers::get_window_settings))
        .route("/api/settings/window", put(handlers::update_window_settings))
        // === LANGUAGE AND MESSAGE ROUTES ===
        .route("/api/languages", get(handlers::get_languages))
        .route("/api/languages", put(handlers::update_languages))
        .route("/api/messages", get(handlers::get_all_messages))
        .route("/api/messages/{language}", get(handlers::get_message))
        .route("/api/messages/{language}", put(handlers::update_message))
        .route("/api/messages/{language}", delete(handlers::delete_message))
        // === CACHE ROUTES ===
        .route("/api/cache/clear", post(handlers::clear_cache))
        .nest_service("/assets", ServeDir::new("assets"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
