//! lostfound/crates/lf-api/src/middleware.rs Middleware
//!
//! Standard middleware for access logging, CORS and security headers.

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};

/// Access log: remote-ip "request-line" status-code response-size time.
/// Records go through the `log` facade and land in the tracing subscriber.
/// The Authorization header is never part of the format.
pub fn standard_middleware() -> Logger {
    Logger::new("%a \"%r\" %s %b %Dms")
}

// Configures CORS (Cross-Origin Resource Sharing)
// The mobile/web clients live on a different origin than the API.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::AUTHORIZATION,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("Referrer-Policy", "strict-origin-when-cross-origin"))
        .add(("Cache-Control", "no-store"))
}
