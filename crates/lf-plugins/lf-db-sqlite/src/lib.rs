//! # lf-db-sqlite Implementation
//!
//! Maps between the SQLite relational model and the `lf-core` domain models.
//! Username and email uniqueness are enforced by unique indexes (see
//! `migrations/`); a violation surfaces as `AppError::Conflict`.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lf_core::error::{AppError, Result};
use lf_core::models::{AdminAccount, ItemReport, ItemType, PostType};
use lf_core::traits::{AccountRepo, ItemRepo};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

/// One pool backs both the account and item repositories.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Opens (creating if needed) the database at `url` and runs migrations.
    pub async fn connect(url: &str, max_connections: u32, acquire_timeout: Duration) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AppError::internal(format!("bad database url: {e}")))?
            .create_if_missing(true);

        // Every connection to `:memory:` is its own database, so pin to one.
        let mut pool_options = SqlitePoolOptions::new().acquire_timeout(acquire_timeout);
        pool_options = if url.contains(":memory:") {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
        } else {
            pool_options.max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await.map_err(store_error)?;
        Self::migrate(&pool).await?;
        tracing::info!(url = %redact(url), "sqlite store ready");
        Ok(Self { pool })
    }

    /// Fresh private database, used by tests and local experiments.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1, Duration::from_secs(5)).await
    }

    async fn migrate(pool: &SqlitePool) -> Result<()> {
        sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
            tracing::error!(error = %e, "migration failed");
            AppError::upstream("database migration failed")
        })
    }
}

/// Folds driver errors into the domain taxonomy. Unique violations are the
/// only ones a client can act on; everything else is an upstream failure.
fn store_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let message = db.message();
            if message.contains(".email") {
                return AppError::conflict("email already exists");
            }
            if message.contains(".username") {
                return AppError::conflict("username already exists");
            }
            return AppError::internal("duplicate primary key");
        }
    }
    tracing::error!(error = %e, "sqlite error");
    AppError::upstream("database unavailable")
}

fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

fn account_from_row(row: &SqliteRow) -> std::result::Result<AdminAccount, sqlx::Error> {
    Ok(AdminAccount {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

fn item_from_row(row: &SqliteRow) -> Result<ItemReport> {
    let post_type: String = row.try_get("post_type").map_err(store_error)?;
    let item_type: String = row.try_get("item_type").map_err(store_error)?;
    let corrupt = |_| AppError::internal("stored item has an unknown category");

    Ok(ItemReport {
        id: row.try_get("id").map_err(store_error)?,
        post_type: PostType::from_str(&post_type).map_err(corrupt)?,
        item_type: ItemType::from_str(&item_type).map_err(corrupt)?,
        location_id: row.try_get("location_id").map_err(store_error)?,
        account_id: row.try_get("account_id").map_err(store_error)?,
        color: row.try_get("color").map_err(store_error)?,
        material: row.try_get("material").map_err(store_error)?,
        image_url: row.try_get("image_url").map_err(store_error)?,
        image_file_name: row.try_get("image_file_name").map_err(store_error)?,
        created_at: row.try_get("created_at").map_err(store_error)?,
        updated_at: row.try_get("updated_at").map_err(store_error)?,
    })
}

const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, phone_number, created_at";

#[async_trait]
impl AccountRepo for SqliteRepo {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM admin_accounts WHERE username = ?"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(account_from_row).transpose().map_err(store_error)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AdminAccount>> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM admin_accounts WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(account_from_row).transpose().map_err(store_error)
    }

    async fn insert_account(&self, account: AdminAccount) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO admin_accounts ({ACCOUNT_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(account.id)
        .bind(account.username)
        .bind(account.email)
        .bind(account.password_hash)
        .bind(account.first_name)
        .bind(account.last_name)
        .bind(account.phone_number)
        .bind(account.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }
}

#[async_trait]
impl ItemRepo for SqliteRepo {
    async fn insert_item(&self, item: ItemReport) -> Result<()> {
        sqlx::query(
            "INSERT INTO items (id, post_type, item_type, location_id, account_id, color, material, image_url, image_file_name, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(item.id)
        .bind(item.post_type.as_str())
        .bind(item.item_type.as_str())
        .bind(item.location_id)
        .bind(item.account_id)
        .bind(item.color)
        .bind(item.material)
        .bind(item.image_url)
        .bind(item.image_file_name)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn get_item(&self, id: Uuid) -> Result<Option<ItemReport>> {
        let row = sqlx::query("SELECT * FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref().map(item_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(username: &str, email: &str) -> AdminAccount {
        AdminAccount {
            id: Uuid::now_v7(),
            username: username.into(),
            email: email.into(),
            password_hash: "$argon2id$v=19$stub".into(),
            first_name: Some("Alice".into()),
            last_name: None,
            phone_number: Some("5551234".into()),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn insert_and_find_account() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        let alice = account("alice01", "alice@example.com");
        repo.insert_account(alice.clone()).await.unwrap();

        let by_name = repo.find_by_username("alice01").await.unwrap().unwrap();
        assert_eq!(by_name.id, alice.id);
        assert_eq!(by_name.phone_number.as_deref(), Some("5551234"));

        let by_email = repo.find_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.username, "alice01");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unique_indexes_report_the_violated_field() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        repo.insert_account(account("alice01", "alice@example.com")).await.unwrap();

        let dup_name = repo
            .insert_account(account("alice01", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(dup_name, AppError::conflict("username already exists"));

        let dup_email = repo
            .insert_account(account("alice02", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(dup_email, AppError::conflict("email already exists"));
    }

    #[tokio::test]
    async fn item_round_trips_through_sqlite() {
        let repo = SqliteRepo::in_memory().await.unwrap();
        // Whole seconds keep the equality check independent of text precision.
        let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        let item = ItemReport {
            id: Uuid::now_v7(),
            post_type: PostType::Lost,
            item_type: ItemType::Glasses,
            location_id: Uuid::now_v7(),
            account_id: Uuid::now_v7(),
            color: Some("black".into()),
            material: None,
            image_url: Some("https://cdn.example.com/a.jpg".into()),
            image_file_name: Some("a.jpg".into()),
            created_at: now,
            updated_at: now,
        };
        repo.insert_item(item.clone()).await.unwrap();

        let loaded = repo.get_item(item.id).await.unwrap().unwrap();
        assert_eq!(loaded, item);
        assert!(repo.get_item(Uuid::now_v7()).await.unwrap().is_none());
    }
}
