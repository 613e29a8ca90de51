use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MailConfig;

/// Outbound mail boundary. Registration and password-reset flows abort when
/// delivery fails, so implementations must report failure honestly.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()>;
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Delivers mail through an HTTP relay that accepts a JSON message.
/// When mail is disabled in config, messages are logged instead; the codes
/// they carry end up in the log for local development.
pub struct RelayMailer {
    client: Client,
    config: MailConfig,
}

impl RelayMailer {
    pub fn new(config: MailConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent("Sarbaz/1.0")
            .timeout(Duration::from_secs(u64::from(config.request_timeout_seconds)))
            .build()
            .context("Failed to build mail HTTP client")?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        if !self.config.enabled {
            info!("Mail disabled; would send to {to}: {subject} / {body}");
            return Ok(());
        }

        let message = RelayMessage {
            from: &self.config.from_email,
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.config.relay_url)
            .json(&message)
            .send()
            .await
            .context("Mail relay request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("Mail relay returned status {}", response.status());
        }

        debug!("Mail sent to {to}: {subject}");
        Ok(())
    }
}

/// Records messages instead of sending them. Test support.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: std::sync::Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
