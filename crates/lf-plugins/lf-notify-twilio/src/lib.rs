//! # lf-notify-twilio
//!
//! `Notifier` implementations for the "item reported" hook:
//! - `TwilioNotifier` texts a fixed recipient through the Twilio Messages API,
//!   retrying transport failures, 429s and 5xx with exponential backoff.
//! - `LogNotifier` only logs, for deployments without SMS credentials.

use std::time::Duration;

use async_trait::async_trait;
use lf_core::error::{AppError, Result};
use lf_core::models::ItemReport;
use lf_core::traits::Notifier;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};

pub struct TwilioConfig {
    pub api_base: String,
    pub account_sid: String,
    pub auth_token: SecretString,
    pub from_number: String,
    pub to_number: String,
    /// Total tries, including the first. Zero is treated as one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub request_timeout: Duration,
}

pub struct TwilioNotifier {
    client: reqwest::Client,
    messages_url: String,
    config: TwilioConfig,
}

impl TwilioNotifier {
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("http client init failed: {e}")))?;
        let messages_url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            config.api_base.trim_end_matches('/'),
            config.account_sid
        );
        Ok(Self {
            client,
            messages_url,
            config,
        })
    }

    async fn send_once(&self, body: &str) -> std::result::Result<(), Attempt> {
        let form = [
            ("To", self.config.to_number.as_str()),
            ("From", self.config.from_number.as_str()),
            ("Body", body),
        ];
        let response = self
            .client
            .post(&self.messages_url)
            .basic_auth(&self.config.account_sid, Some(self.config.auth_token.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(|e| Attempt::Retry(format!("transport error: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(Attempt::Retry(format!("twilio returned {status}")));
        }
        Err(Attempt::GiveUp(format!("twilio rejected message with {status}")))
    }
}

enum Attempt {
    Retry(String),
    GiveUp(String),
}

/// The SMS text for a report.
pub fn message_body(item: &ItemReport) -> String {
    let details: Vec<&str> = [item.color.as_deref(), item.material.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    let details = if details.is_empty() {
        String::new()
    } else {
        format!(" ({})", details.join(", "))
    };
    format!(
        "{} item reported: {}{}. Ref {}",
        item.post_type, item.item_type, details, item.id
    )
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn item_reported(&self, item: &ItemReport) -> Result<()> {
        let body = message_body(item);
        let attempts = self.config.max_attempts.max(1);
        let mut backoff = self.config.initial_backoff;

        let mut attempt = 1;
        loop {
            match self.send_once(&body).await {
                Ok(()) => {
                    tracing::info!(item_id = %item.id, attempt, "sms notification sent");
                    return Ok(());
                }
                Err(Attempt::GiveUp(reason)) => return Err(AppError::upstream(reason)),
                Err(Attempt::Retry(reason)) => {
                    if attempt >= attempts {
                        return Err(AppError::upstream(format!("{reason} after {attempts} attempts")));
                    }
                    tracing::debug!(item_id = %item.id, attempt, %reason, "retrying sms notification");
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                    attempt += 1;
                }
            }
        }
    }
}

/// Stand-in used when no SMS provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn item_reported(&self, item: &ItemReport) -> Result<()> {
        tracing::info!(item_id = %item.id, message = %message_body(item), "item reported (sms disabled)");
        Ok(())
    }
}
