use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::fs;
use tracing::info;

use super::Config;

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let config: Config = toml::from_str(&main_config_content)
            .map_err(|e| anyhow!("Failed to parse main config: {}", e))?;

        info!(
            "Configuration loaded: listening on {}:{}, database at {}, smtp {}",
            config.host,
            config.port,
            config.database_path,
            if config.smtp.is_some() {
                "configured"
            } else {
                "not configured"
            }
        );

        Ok(config)
    }
}
