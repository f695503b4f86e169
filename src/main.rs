use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use maintenance_page::config::ConfigManager;
use maintenance_page::database::Database;
use maintenance_page::services::{MessageService, NotifyService};
use maintenance_page::settings::SettingsStore;
use maintenance_page::transients::TransientStore;
use maintenance_page::web::{load_templates, start_web_server};
use maintenance_page::window::WindowEvaluator;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("maintenance_page=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("lettre=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting Scheduled Maintenance Page");

    // Load configuration
    let config_manager = ConfigManager::new("config".to_string()).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: listening on {}:{}, site {}",
        config.host, config.port, config.site_name
    );

    // Initialize database
    let database = Arc::new(Database::new(&config.database_path).await?);
    info!("Database initialized at {}", config.database_path);

    // Transient cache for derived window facts
    let transients = Arc::new(TransientStore::new());

    let settings = Arc::new(SettingsStore::new(database.clone(), transients.clone()));
    settings.ensure_defaults().await?;
    info!("Settings store ready");

    let evaluator = Arc::new(WindowEvaluator::new(settings.clone(), transients.clone()));
    let messages = Arc::new(MessageService::new(database.clone(), settings.clone()));

    let notify = Arc::new(NotifyService::new(config.clone(), settings.clone()));
    if config.smtp.is_some() {
        info!("Email notifications enabled via SMTP relay");
    } else {
        warn!("No [smtp] section in config/main.toml; email notifications are disabled");
    }

    let templates = Arc::new(load_templates("templates")?);
    info!("Templates loaded");

    // Background watcher: evaluates the window on an interval so
    // transitions are noticed and notified even with no traffic
    let watcher_settings = settings.clone();
    let watcher_transients = transients.clone();
    let watcher_evaluator = evaluator.clone();
    let watcher_notify = notify.clone();
    let check_interval = config.check_interval_seconds;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(check_interval));
        loop {
            interval.tick().await;
            let swept = watcher_transients.sweep_expired().await;
            if swept > 0 {
                info!("Swept {} expired cache entries", swept);
            }

            let window = match watcher_settings.window().await {
                Ok(window) => window,
                Err(e) => {
                    error!("Window check failed to load settings: {}", e);
                    continue;
                }
            };
            let state = watcher_evaluator.current_state().await;
            if let Err(e) = watcher_notify.observe(&state, &window).await {
                error!("Notification check failed: {}", e);
            }
        }
    });
    info!("Window watcher started (every {}s)", check_interval);

    // Start web server (this blocks)
    start_web_server(
        config,
        database,
        settings,
        transients,
        evaluator,
        messages,
        templates,
    )
    .await?;

    Ok(())
}
