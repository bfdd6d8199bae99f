//! Per-call deadline for collaborator I/O.

use std::future::Future;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Runs `fut` under `limit`; an elapsed deadline becomes `AppError::Upstream`.
pub async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(call = what, timeout_ms = limit.as_millis() as u64, "collaborator call timed out");
            Err(AppError::upstream(format!("{what} timed out")))
        }
    }
}
