pub mod manager;
pub use manager::ConfigManager;

use serde::{Deserialize, Serialize};

use crate::constants::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    /// Public URL of the site this service fronts, included in emails
    pub site_url: Option<String>,
    /// Fallback notification recipient when no addresses are configured
    pub admin_email: Option<String>,
    #[serde(default = "default_check_interval")]
    pub check_interval_seconds: u64,
    /// When set, the page preview query must carry this token
    pub preview_token: Option<String>,
    pub smtp: Option<SmtpConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Use STARTTLS instead of implicit TLS
    #[serde(default)]
    pub starttls: bool,
    pub from_address: String,
}

fn default_database_path() -> String {
    defaults::DATABASE_PATH.to_string()
}

fn default_site_name() -> String {
    "Maintenance".to_string()
}

fn default_check_interval() -> u64 {
    defaults::CHECK_INTERVAL_SECONDS
}

fn default_smtp_port() -> u16 {
    587
}
