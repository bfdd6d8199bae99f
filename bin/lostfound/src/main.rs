//! # lostfound Binary
//!
//! The entry point that assembles the service from its plugins and the
//! settings resolved at startup.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use lf_api::{configure_routes, middleware, AppState};
use lf_auth_simple::{Argon2Hasher, JwtTokenIssuer};
use lf_config::{NotifySettings, Settings};
use lf_core::traits::{Notifier, TokenIssuer};
use lf_core::{AccountDirectory, ItemRecordStore};
use lf_db_sqlite::SqliteRepo;
use lf_notify_twilio::{LogNotifier, TwilioConfig, TwilioNotifier};
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load().context("loading configuration")?;

    // 1. Initialize Database Implementation
    let repo = Arc::new(
        SqliteRepo::connect(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.timeout(),
        )
        .await
        .context("opening database")?,
    );

    // 2. Initialize Auth Implementation
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.token_ttl_secs,
    ));

    // 3. Initialize Notification Implementation
    let (notifier, notify_timeout) = build_notifier(settings.notify)?;

    // 4. Wrap in AppState (Using dynamic dispatch for maximum flexibility)
    let directory = AccountDirectory::new(repo.clone(), Arc::new(Argon2Hasher), tokens.clone())
        .with_call_timeout(settings.database.timeout());
    let items = ItemRecordStore::new(repo, notifier)
        .with_call_timeout(settings.database.timeout())
        .with_notify_timeout(notify_timeout);
    let state = web::Data::new(AppState {
        directory,
        items,
        tokens,
    });

    let bind = (settings.server.host, settings.server.port);
    tracing::info!(host = %bind.0, port = bind.1, "🚀 lostfound starting");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::security_headers())
            .wrap(middleware::cors_policy())
            .wrap(middleware::standard_middleware())
            .configure(configure_routes)
    })
    .bind(bind)
    .context("binding listener")?
    .run()
    .await
    .context("server error")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing init failed: {e}");
    }
}

/// Twilio when configured, log-only otherwise. Also returns the deadline the
/// item store should give each dispatch.
fn build_notifier(notify: NotifySettings) -> anyhow::Result<(Arc<dyn Notifier>, Duration)> {
    let timeout = notify.timeout();
    let initial_backoff = notify.initial_backoff();

    let Some(twilio) = notify.twilio else {
        tracing::warn!("no twilio settings; item reports will only be logged");
        let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
        return Ok((notifier, timeout));
    };

    let attempts = notify.max_attempts.max(1);
    let outer = notify_deadline(timeout, initial_backoff, attempts);

    let notifier: Arc<dyn Notifier> = Arc::new(TwilioNotifier::new(TwilioConfig {
        api_base: twilio.api_base,
        account_sid: twilio.account_sid,
        auth_token: twilio.auth_token,
        from_number: twilio.from_number,
        to_number: twilio.to_number,
        max_attempts: attempts,
        initial_backoff,
        request_timeout: timeout,
    })
    .context("building twilio notifier")?);
    tracing::info!(max_attempts = attempts, "twilio notifications enabled");
    Ok((notifier, outer))
}

/// Retries happen inside the notifier, so the outer deadline has to cover
/// every attempt plus the doubling backoff between them. Saturates instead of
/// overflowing on extreme settings.
fn notify_deadline(timeout: Duration, initial_backoff: Duration, attempts: u32) -> Duration {
    let attempts = attempts.max(1);
    let backoff_total =
        initial_backoff.saturating_mul(2u32.saturating_pow(attempts - 1).saturating_sub(1));
    timeout.saturating_mul(attempts).saturating_add(backoff_total)
}
