//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.
//! Implementations translate their own failures into `AppError` before
//! returning, so the services never see driver or HTTP client types.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AdminAccount, ItemReport, TokenClaims};

/// Persistence contract for administrator accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepo: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>>;

    /// Inserts a new account. A unique-index violation must come back as
    /// `AppError::Conflict` naming the offending field.
    async fn insert_account(&self, account: AdminAccount) -> Result<()>;
}

/// Persistence contract for item reports.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ItemRepo: Send + Sync {
    async fn insert_item(&self, item: ItemReport) -> Result<()>;
    async fn get_item(&self, id: Uuid) -> Result<Option<ItemReport>>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Returns a self-describing hash string safe to store.
    async fn hash_password(&self, password: &str) -> Result<String>;

    /// Verifies a password against a stored hash. A malformed hash is a
    /// mismatch, not an error.
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Mints and checks opaque bearer tokens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account: &AdminAccount) -> Result<String>;

    /// Returns `AppError::Unauthorized` for expired, forged, or garbled tokens.
    fn verify(&self, token: &str) -> Result<TokenClaims>;
}

/// Outbound "item reported" hook (SMS or similar).
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn item_reported(&self, item: &ItemReport) -> Result<()>;
}
