//! Credential extraction from request headers.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use base64::Engine;
use lf_core::error::AppError;
use lf_core::models::TokenClaims;

use crate::error::ApiError;
use crate::AppState;

/// Username/password pair from an `Authorization: Basic` header.
///
/// Either half may be empty; the directory decides what "missing" means.
#[derive(Debug, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    pub fn from_request(req: &HttpRequest) -> Result<Self, AppError> {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::validation("username and password are required"))?
            .to_str()
            .map_err(|_| AppError::validation("malformed authorization header"))?;

        let encoded = scheme_param(header, "basic")
            .ok_or_else(|| AppError::validation("basic credentials are required"))?;
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|_| AppError::validation("malformed authorization header"))?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| AppError::validation("malformed authorization header"))?;

        // No colon at all means only one value was supplied.
        let (username, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// A request carrying a valid bearer token.
#[derive(Debug)]
pub struct AuthenticatedAdmin(pub TokenClaims);

impl FromRequest for AuthenticatedAdmin {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(bearer_claims(req).map(AuthenticatedAdmin).map_err(ApiError))
    }
}

fn bearer_claims(req: &HttpRequest) -> Result<TokenClaims, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::internal("application state missing"))?;

    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| scheme_param(h, "bearer"))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("bearer token required"))?;

    state.tokens.verify(token)
}

/// Returns the credentials part of `header` when its scheme is `scheme`.
/// Schemes compare case-insensitively.
fn scheme_param<'a>(header: &'a str, scheme: &str) -> Option<&'a str> {
    let (given, param) = header.trim_start().split_once(' ')?;
    given.eq_ignore_ascii_case(scheme).then(|| param.trim())
}
