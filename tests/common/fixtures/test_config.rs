//! Test configuration builder

use maintenance_page::config::{Config, SmtpConfig};

pub struct TestConfigBuilder {
    config: Config,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                database_path: ":memory:".to_string(),
                site_name: "Test Site".to_string(),
                site_url: Some("https://test.example".to_string()),
                admin_email: None,
                check_interval_seconds: 30,
                preview_token: None,
                smtp: None,
            },
        }
    }

    pub fn with_site_name(mut self, name: &str) -> Self {
        self.config.site_name = name.to_string();
        self
    }

    pub fn with_admin_email(mut self, email: &str) -> Self {
        self.config.admin_email = Some(email.to_string());
        self
    }

    pub fn with_preview_token(mut self, token: &str) -> Self {
        self.config.preview_token = Some(token.to_string());
        self
    }

    pub fn with_smtp(mut self, host: &str) -> Self {
        self.config.smtp = Some(SmtpConfig {
            host: host.to_string(),
            port: 587,
            username: None,
            password: None,
            starttls: false,
            from_address: "maintenance@test.example".to_string(),
        });
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
