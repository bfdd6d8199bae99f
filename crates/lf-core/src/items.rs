//! # Item Record Store
//!
//! Validates lost/found submissions, fires the "item reported" hook, then
//! persists. The hook runs before the insert and is fail-open: an SMS outage
//! is logged and the report is still stored.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::directory::DEFAULT_CALL_TIMEOUT;
use crate::error::{AppError, Result};
use crate::models::{non_blank, ItemReport, ItemType, NewItemRequest, PostType};
use crate::timeout::bounded;
use crate::traits::{ItemRepo, Notifier};

pub const DEFAULT_NOTIFY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct ItemRecordStore {
    items: Arc<dyn ItemRepo>,
    notifier: Arc<dyn Notifier>,
    call_timeout: Duration,
    notify_timeout: Duration,
}

impl ItemRecordStore {
    pub fn new(items: Arc<dyn ItemRepo>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            items,
            notifier,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            notify_timeout: DEFAULT_NOTIFY_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_notify_timeout(mut self, notify_timeout: Duration) -> Self {
        self.notify_timeout = notify_timeout;
        self
    }

    /// Validates and stores a new report, returning it with id and timestamps.
    pub async fn create_item(&self, request: NewItemRequest) -> Result<ItemReport> {
        // 1. Validation
        let post_type: PostType = required(request.post_type, "postType")?.parse()?;
        let item_type: ItemType = required(request.item_type, "itemType")?.parse()?;
        let location_id = parse_id(required(request.location_id, "locationId")?, "locationId")?;
        let account_id = parse_id(required(request.account_id, "accountId")?, "accountId")?;

        let now = Utc::now();
        let item = ItemReport {
            id: Uuid::now_v7(),
            post_type,
            item_type,
            location_id,
            account_id,
            color: non_blank(request.color),
            material: non_blank(request.material),
            image_url: non_blank(request.image_url),
            image_file_name: non_blank(request.image_file_name),
            created_at: now,
            updated_at: now,
        };

        // 2. Pre-save hook (fail-open)
        match tokio::time::timeout(self.notify_timeout, self.notifier.item_reported(&item)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(item_id = %item.id, error = %e, "item notification failed; storing anyway"),
            Err(_) => warn!(item_id = %item.id, "item notification timed out; storing anyway"),
        }

        // 3. Persistence
        bounded(self.call_timeout, "item insert", self.items.insert_item(item.clone())).await?;
        info!(
            item_id = %item.id,
            post_type = %item.post_type,
            item_type = %item.item_type,
            "item report stored"
        );

        Ok(item)
    }

    pub async fn get_item(&self, id: Uuid) -> Result<ItemReport> {
        bounded(self.call_timeout, "item lookup", self.items.get_item(id))
            .await?
            .ok_or_else(|| AppError::NotFound("Item".to_string(), id.to_string()))
    }
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    non_blank(value).ok_or_else(|| AppError::validation(format!("{field} is required")))
}

fn parse_id(raw: String, field: &str) -> Result<Uuid> {
    Uuid::parse_str(&raw).map_err(|_| AppError::validation(format!("{field} is not a valid identifier")))
}
