//! # lf-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the core
//! services. Handlers stay thin: parse, call one service method, serialize.

use actix_web::{web, HttpRequest, HttpResponse};
use lf_core::error::AppError;
use lf_core::models::{NewAccountRequest, NewItemRequest};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{AuthenticatedAdmin, BasicCredentials};
use crate::AppState;

type ApiResult = Result<HttpResponse, ApiError>;

/// `POST /api/admin/create`
pub async fn create_admin(
    data: web::Data<AppState>,
    payload: web::Json<NewAccountRequest>,
) -> ApiResult {
    let session = data.directory.create(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// `GET /api/admin/login` with HTTP Basic credentials.
pub async fn login(data: web::Data<AppState>, req: HttpRequest) -> ApiResult {
    let creds = BasicCredentials::from_request(&req)?;
    let session = data
        .directory
        .authenticate(&creds.username, &creds.password)
        .await?;
    Ok(HttpResponse::Ok().json(session))
}

/// `POST /api/items`
pub async fn create_item(
    data: web::Data<AppState>,
    admin: AuthenticatedAdmin,
    payload: web::Json<NewItemRequest>,
) -> ApiResult {
    tracing::debug!(reporter = %admin.0.sub, "item submission");
    let item = data.items.create_item(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// `GET /api/items/{id}`
pub async fn get_item(
    data: web::Data<AppState>,
    _admin: AuthenticatedAdmin,
    path: web::Path<String>,
) -> ApiResult {
    let raw = path.into_inner();
    let id = Uuid::parse_str(&raw).map_err(|_| AppError::validation("item id is not a valid identifier"))?;
    let item = data.items.get_item(id).await?;
    Ok(HttpResponse::Ok().json(item))
}

/// Liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
