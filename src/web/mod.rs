pub mod handlers;
pub mod server;

pub use server::{create_router, load_templates, start_web_server};

use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use crate::database::Database;
use crate::services::MessageService;
use crate::settings::SettingsStore;
use crate::transients::TransientStore;
use crate::window::WindowEvaluator;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub database: Arc<Database>,
    pub settings: Arc<SettingsStore>,
    pub transients: Arc<TransientStore>,
    pub evaluator: Arc<WindowEvaluator>,
    pub messages: Arc<MessageService>,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        database: Arc<Database>,
        settings: Arc<SettingsStore>,
        transients: Arc<TransientStore>,
        evaluator: Arc<WindowEvaluator>,
        messages: Arc<MessageService>,
        templates: Arc<Tera>,
    ) -> Self {
        Self {
            config,
            database,
            settings,
            transients,
            evaluator,
            messages,
            templates,
        }
    }
}
