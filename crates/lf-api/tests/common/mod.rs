//! Shared wiring for the HTTP-level tests: real SQLite (in memory), real
//! argon2 and JWT, and whichever notifier the test wants.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use base64::Engine;
use lf_api::AppState;
use lf_auth_simple::{Argon2Hasher, JwtTokenIssuer};
use lf_core::traits::{Notifier, TokenIssuer};
use lf_core::{AccountDirectory, ItemRecordStore};
use lf_db_sqlite::SqliteRepo;
use lf_notify_twilio::LogNotifier;

pub async fn state() -> web::Data<AppState> {
    state_with_notifier(Arc::new(LogNotifier)).await
}

pub async fn state_with_notifier(notifier: Arc<dyn Notifier>) -> web::Data<AppState> {
    let repo = Arc::new(SqliteRepo::in_memory().await.expect("in-memory sqlite"));
    let tokens: Arc<dyn TokenIssuer> = Arc::new(JwtTokenIssuer::new(b"integration-secret", 3600));
    let directory = AccountDirectory::new(repo.clone(), Arc::new(Argon2Hasher), tokens.clone());
    let items = ItemRecordStore::new(repo, notifier);
    web::Data::new(AppState {
        directory,
        items,
        tokens,
    })
}

pub fn basic(username: &str, password: &str) -> String {
    let raw = format!("{username}:{password}");
    format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(raw))
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Builds the full app around `state`, the same way `main` does.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .configure(lf_api::configure_routes),
        )
        .await
    };
}
