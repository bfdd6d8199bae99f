//! Maps `AppError` onto HTTP responses.
//!
//! Body shape: `{"error": "<code>", "message": "<text>"}`. Upstream and
//! internal failures get a fixed message; the detail only goes to the log.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use lf_core::error::AppError;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = self.0.to_string();
        let message = match &self.0 {
            AppError::Upstream(_) => {
                tracing::warn!(error = %detail, "upstream failure");
                "service temporarily unavailable"
            }
            AppError::Internal(_) => {
                tracing::error!(error = %detail, "internal failure");
                "internal server error"
            }
            _ => detail.as_str(),
        };

        let mut builder = HttpResponse::build(self.status_code());
        if matches!(self.0, AppError::Unauthorized(_)) {
            builder.insert_header(("WWW-Authenticate", "Basic realm=\"lostfound\""));
        }
        builder.json(ErrorBody {
            error: self.0.code(),
            message,
        })
    }
}

/// Turns body-parse failures into the standard 400 body.
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError(AppError::validation(format!("malformed JSON body: {err}"))).into()
}
