//! Temporary environment with a real SQLite database on disk

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tempfile::TempDir;

use maintenance_page::config::Config;
use maintenance_page::constants::keys;
use maintenance_page::database::{Database, MessageRecord, SettingRecord};
use maintenance_page::services::{MessageService, NotifyService};
use maintenance_page::settings::SettingsStore;
use maintenance_page::transients::TransientStore;
use maintenance_page::web::{create_router, load_templates, AppState};
use maintenance_page::window::WindowEvaluator;

use super::TestConfigBuilder;

pub struct TestEnv {
    // Held so the database file outlives the test
    _tmp: TempDir,
    pub config: Arc<Config>,
    pub database: Arc<Database>,
    pub transients: Arc<TransientStore>,
    pub settings: Arc<SettingsStore>,
    pub evaluator: Arc<WindowEvaluator>,
    pub messages: Arc<MessageService>,
}

impl TestEnv {
    pub async fn new() -> Result<Self> {
        Self::with_config(TestConfigBuilder::new().build()).await
    }

    pub async fn with_config(config: Config) -> Result<Self> {
        let tmp = TempDir::new()?;
        let db_path = tmp.path().join("test.db");
        let database = Arc::new(Database::new(&db_path.to_string_lossy()).await?);
        let transients = Arc::new(TransientStore::new());
        let settings = Arc::new(SettingsStore::new(database.clone(), transients.clone()));
        settings.ensure_defaults().await?;
        let evaluator = Arc::new(WindowEvaluator::new(settings.clone(), transients.clone()));
        let messages = Arc::new(MessageService::new(database.clone(), settings.clone()));

        Ok(Self {
            _tmp: tmp,
            config: Arc::new(config),
            database,
            transients,
            settings,
            evaluator,
            messages,
        })
    }

    pub fn notify_service(&self) -> NotifyService {
        NotifyService::new(self.config.clone(), self.settings.clone())
    }

    /// Configure the maintenance window through the normal save path
    pub async fn save_window(
        &self,
        enabled: bool,
        start: &str,
        end: &str,
        timezone: &str,
    ) -> Result<()> {
        let mut values = BTreeMap::new();
        values.insert(
            keys::ENABLED.to_string(),
            if enabled { "1" } else { "0" }.to_string(),
        );
        values.insert(keys::START_TIME.to_string(), start.to_string());
        values.insert(keys::END_TIME.to_string(), end.to_string());
        values.insert(keys::TIMEZONE.to_string(), timezone.to_string());
        self.settings.save_many(&values).await?;
        Ok(())
    }

    /// Write a setting straight to the database, leaving cached facts alone
    pub async fn write_setting_raw(&self, key: &str, value: &str) -> Result<()> {
        self.database
            .upsert_setting(&SettingRecord {
                key: key.to_string(),
                value: value.to_string(),
                updated_at: Utc::now(),
            })
            .await
    }

    pub async fn add_message(
        &self,
        language: &str,
        heading: &str,
        description: &str,
    ) -> Result<()> {
        self.database
            .upsert_message(&MessageRecord {
                language: language.to_string(),
                heading: heading.to_string(),
                description: description.to_string(),
                countdown_label: "We'll be back in:".to_string(),
                updated_at: Utc::now(),
            })
            .await
    }

    /// Router with the full handler stack, for request-level tests
    pub fn router(&self) -> Result<axum::Router> {
        let templates = Arc::new(load_templates("templates")?);
        let state = AppState::new(
            self.config.clone(),
            self.database.clone(),
            self.settings.clone(),
            self.transients.clone(),
            self.evaluator.clone(),
            self.messages.clone(),
            templates,
        );
        Ok(create_router(state))
    }
}
