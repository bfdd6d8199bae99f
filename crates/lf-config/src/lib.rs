//! # lf-config
//!
//! Process-wide settings, resolved once at startup.
//!
//! Layers, lowest precedence first:
//! 1. built-in defaults
//! 2. `config/default.toml`, then `config/local.toml` (both optional)
//! 3. `LOSTFOUND__SECTION__KEY` environment variables
//! 4. plain `PORT` and `DATABASE_URL`
//!
//! A `.env` file, if present, is folded into the environment first.

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub notify: NotifySettings,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// e.g. `sqlite:lostfound.db?mode=rwc` or `sqlite::memory:`
    pub url: String,
    pub max_connections: u32,
    pub timeout_ms: u64,
}

impl DatabaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    #[serde(deserialize_with = "secret")]
    pub jwt_secret: SecretString,
    pub token_ttl_secs: i64,
}

#[derive(Debug, Deserialize)]
pub struct NotifySettings {
    pub timeout_ms: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    /// Absent means item reports are only logged, not texted.
    pub twilio: Option<TwilioSettings>,
}

impl NotifySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }
}

#[derive(Debug, Deserialize)]
pub struct TwilioSettings {
    pub account_sid: String,
    #[serde(deserialize_with = "secret")]
    pub auth_token: SecretString,
    pub from_number: String,
    /// Who gets texted when an item is reported.
    pub to_number: String,
    #[serde(default = "default_twilio_base")]
    pub api_base: String,
}

fn default_twilio_base() -> String {
    "https://api.twilio.com".to_string()
}

fn secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl Settings {
    /// Loads settings from every layer. Call once, in `main`.
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }

        let settings = defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("LOSTFOUND")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

/// The built-in defaults layer. Exposed so tests can stack overrides on it.
pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 3000)?
        .set_default("database.url", "sqlite:lostfound.db?mode=rwc")?
        .set_default("database.max_connections", 5)?
        .set_default("database.timeout_ms", 5000)?
        .set_default("auth.token_ttl_secs", 86_400)?
        .set_default("notify.timeout_ms", 5000)?
        .set_default("notify.max_attempts", 3)?
        .set_default("notify.initial_backoff_ms", 200)?)
}
