//! Database layer for the maintenance page server.
//!
//! SQLite persistence for:
//! - Settings (flat key-value store, the source of truth for all
//!   administrator-configurable state)
//! - Messages (localized maintenance messages per language)
//!
//! Submodules:
//! - `records` - Record types (entities)
//! - `settings` - Key-value settings operations
//! - `messages` - Localized message operations

mod messages;
mod records;
mod settings;

pub use records::*;

use std::path::Path;

use anyhow::Result;
use sqlx::{Pool, Sqlite, SqlitePool};
use tracing::{error, info};

pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Expose pool for integration test queries
    #[allow(dead_code)]
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn new(database_path: &str) -> Result<Self> {
        info!("Database path: {}", database_path);

        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = tokio::fs::create_dir_all(parent).await {
                    error!("Failed to create parent directory {:?}: {}", parent, e);
                    return Err(e.into());
                }
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path);
        let pool = match SqlitePool::connect(&database_url).await {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to connect to database at {}: {}", database_url, e);
                return Err(e.into());
            }
        };

        let database = Self { pool };
        database.initialize_tables().await?;
        info!("Database initialized");

        Ok(database)
    }

    async fn initialize_tables(&self) -> Result<()> {
        let settings_table_sql = r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(settings_table_sql).execute(&self.pool).await {
            error!("Failed to create settings table: {}", e);
            return Err(e.into());
        }

        let messages_table_sql = r#"
            CREATE TABLE IF NOT EXISTS messages (
                language TEXT PRIMARY KEY,
                heading TEXT NOT NULL,
                description TEXT NOT NULL,
                countdown_label TEXT NOT NULL,
                updated_at DATETIME NOT NULL
            )
        "#;
        if let Err(e) = sqlx::query(messages_table_sql).execute(&self.pool).await {
            error!("Failed to create messages table: {}", e);
            return Err(e.into());
        }

        Ok(())
    }
}
