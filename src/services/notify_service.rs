//! Window transition notifications.
//!
//! Watches the evaluated window state and sends a plain-text email when
//! the window opens (and optionally when it closes). Each window instance
//! notifies at most once per direction: a marker holding the window
//! fingerprint is persisted in the settings store before the send is
//! attempted, so failures are logged and dropped without a retry, and a
//! restart inside an active window does not resend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::{Config, SmtpConfig};
use crate::constants::{email, keys};
use crate::settings::{EmailSettings, SettingsStore, WindowSettings};
use crate::window::WindowState;

pub struct NotifyService {
    config: Arc<Config>,
    settings: Arc<SettingsStore>,
    previous_active: Arc<RwLock<Option<bool>>>,
}

impl NotifyService {
    pub fn new(config: Arc<Config>, settings: Arc<SettingsStore>) -> Self {
        Self {
            config,
            settings,
            previous_active: Arc::new(RwLock::new(None)),
        }
    }

    /// Feed one observation of the evaluated window state. Called by the
    /// background watcher on every tick.
    pub async fn observe(&self, state: &WindowState, window: &WindowSettings) -> Result<()> {
        let active = state.is_active();
        let previous = {
            let mut guard = self.previous_active.write().await;
            guard.replace(active)
        };

        let Some(fingerprint) = window.fingerprint() else {
            return Ok(());
        };

        match (previous, active) {
            // Entered the window; None covers a restart mid-window, where
            // the persisted marker decides whether anything is sent.
            (Some(false) | None, true) => self.notify_start(&fingerprint, window).await,
            (Some(true), false) if matches!(state, WindowState::Ended) => {
                self.notify_end(&fingerprint, window).await
            }
            _ => Ok(()),
        }
    }

    async fn notify_start(&self, fingerprint: &str, window: &WindowSettings) -> Result<()> {
        let email_settings = self.settings.email().await?;
        if !email_settings.enabled {
            return Ok(());
        }

        if self.already_sent(keys::EMAIL_SENT_START, fingerprint).await? {
            debug!("start notification already sent for window {}", fingerprint);
            return Ok(());
        }
        self.settings.set(keys::EMAIL_SENT_START, fingerprint).await?;

        let subject = email_settings
            .subject_start
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{} | Maintenance mode started", self.config.site_name));
        let body = email_settings
            .message_start
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_body("has entered scheduled maintenance", window));

        self.dispatch(&email_settings, subject, body).await;
        Ok(())
    }

    async fn notify_end(&self, fingerprint: &str, window: &WindowSettings) -> Result<()> {
        let email_settings = self.settings.email().await?;
        if !email_settings.enabled || !email_settings.notify_end {
            return Ok(());
        }

        if self.already_sent(keys::EMAIL_SENT_END, fingerprint).await? {
            debug!("end notification already sent for window {}", fingerprint);
            return Ok(());
        }
        self.settings.set(keys::EMAIL_SENT_END, fingerprint).await?;

        let subject = email_settings
            .subject_end
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("{} | Maintenance mode ended", self.config.site_name));
        let body = email_settings
            .message_end
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.default_body("has left scheduled maintenance", window));

        self.dispatch(&email_settings, subject, body).await;
        Ok(())
    }

    async fn already_sent(&self, marker_key: &str, fingerprint: &str) -> Result<bool> {
        Ok(self.settings.get(marker_key).await?.as_deref() == Some(fingerprint))
    }

    fn default_body(&self, event: &str, window: &WindowSettings) -> String {
        let mut body = format!("{} {}.\n", self.config.site_name, event);
        body.push_str("\n--\n");
        body.push_str(&format!(
            "Window: {} to {} ({})\n",
            window.start.as_deref().unwrap_or("-"),
            window.end.as_deref().unwrap_or("-"),
            window.timezone
        ));
        if let Some(url) = &self.config.site_url {
            body.push_str(&format!("URL: {}\n", url));
        }
        body
    }

    /// Send failures are logged and dropped; the marker was already
    /// written, so there is no retry.
    async fn dispatch(&self, email_settings: &EmailSettings, subject: String, body: String) {
        let recipients = self.recipients(email_settings);
        if recipients.is_empty() {
            warn!("email notification skipped: no recipient addresses configured");
            return;
        }
        let Some(smtp) = self.config.smtp.clone() else {
            warn!("email notification skipped: no smtp relay configured");
            return;
        };

        info!("sending maintenance notification to {:?}", recipients);
        let result = tokio::task::spawn_blocking(move || {
            send_email(&smtp, &recipients, &subject, &body)
        })
        .await;

        match result {
            Ok(Ok(())) => debug!("maintenance notification delivered"),
            Ok(Err(e)) => warn!("failed to send maintenance notification: {}", e),
            Err(e) => warn!("notification task panicked: {}", e),
        }
    }

    fn recipients(&self, email_settings: &EmailSettings) -> Vec<String> {
        if !email_settings.addresses.is_empty() {
            email_settings.addresses.clone()
        } else {
            self.config.admin_email.iter().cloned().collect()
        }
    }
}

fn send_email(smtp: &SmtpConfig, recipients: &[String], subject: &str, body: &str) -> Result<()> {
    let from: Mailbox = smtp
        .from_address
        .parse()
        .with_context(|| format!("invalid from address: {}", smtp.from_address))?;

    let mut builder = Message::builder().from(from).subject(subject);
    let mut valid_recipients = 0;
    for recipient in recipients {
        match recipient.parse::<Mailbox>() {
            Ok(mailbox) => {
                builder = builder.to(mailbox);
                valid_recipients += 1;
            }
            Err(e) => warn!("skipping invalid recipient {}: {}", recipient, e),
        }
    }
    if valid_recipients == 0 {
        return Err(anyhow!("no valid recipient addresses"));
    }

    let message = builder.body(body.to_string())?;
    let transport = acquire_transport(smtp)?;
    transport.send(&message)?;
    Ok(())
}

fn acquire_transport(smtp: &SmtpConfig) -> Result<SmtpTransport> {
    let relay = if smtp.starttls {
        SmtpTransport::starttls_relay(&smtp.host)?
    } else {
        SmtpTransport::relay(&smtp.host)?
    };

    let relay = relay
        .port(smtp.port)
        .timeout(Some(Duration::from_secs(email::DISPATCH_TIMEOUT_SECONDS)));

    let relay = match (&smtp.username, &smtp.password) {
        (Some(username), Some(password)) => {
            relay.credentials(Credentials::new(username.clone(), password.clone()))
        }
        _ => relay,
    };

    Ok(relay.build())
}
