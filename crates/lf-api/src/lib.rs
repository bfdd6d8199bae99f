//! # lf-api
//!
//! The web routing and orchestration layer for the lost & found service.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use actix_web::web;
use lf_core::traits::TokenIssuer;
use lf_core::{AccountDirectory, ItemRecordStore};

/// State shared across all actix-web workers. Built once in `main` and
/// handed to handlers through `web::Data`.
pub struct AppState {
    pub directory: AccountDirectory,
    pub items: ItemRecordStore,
    /// Used by the bearer-token extractor.
    pub tokens: Arc<dyn TokenIssuer>,
}

/// Configures the routes for the service.
///
/// # Developer Note
/// The JSON config is registered here, not in `main`, so tests that only
/// call `configure_routes` get the same 400 body for malformed JSON.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/api")
                .route("/admin/create", web::post().to(handlers::create_admin))
                .route("/admin/login", web::get().to(handlers::login))
                .route("/items", web::post().to(handlers::create_item))
                .route("/items/{id}", web::get().to(handlers::get_item)),
        );
}
