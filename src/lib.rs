pub mod config;
pub mod constants;
pub mod database;
pub mod services;
pub mod settings;
pub mod transients;
pub mod web;
pub mod window;

// Re-export commonly used types
pub use config::{Config, ConfigManager, SmtpConfig};
pub use database::Database;
pub use services::{MessageService, NotifyService, ResolvedMessage};
pub use settings::SettingsStore;
pub use transients::TransientStore;
pub use window::{WindowEvaluator, WindowState};
