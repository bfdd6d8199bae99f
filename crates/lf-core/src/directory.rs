//! # Account Directory
//!
//! Owns administrator creation and login. Uniqueness is checked up front
//! (username before email) and backstopped by the store's unique indexes,
//! which are what actually arbitrate concurrent creates.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{non_blank, AdminAccount, AuthSession, NewAccountRequest};
use crate::timeout::bounded;
use crate::traits::{AccountRepo, CredentialHasher, TokenIssuer};

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Unknown user and wrong password share this message so login responses
/// don't reveal which usernames exist.
const BAD_CREDENTIALS: &str = "invalid username or password";

pub struct AccountDirectory {
    accounts: Arc<dyn AccountRepo>,
    hasher: Arc<dyn CredentialHasher>,
    tokens: Arc<dyn TokenIssuer>,
    call_timeout: Duration,
}

impl AccountDirectory {
    pub fn new(
        accounts: Arc<dyn AccountRepo>,
        hasher: Arc<dyn CredentialHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            accounts,
            hasher,
            tokens,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Deadline applied to each store round-trip.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Creates an administrator and returns a token for it.
    ///
    /// Required fields are checked in the order username, email, password.
    /// When both username and email are taken the username conflict wins.
    pub async fn create(&self, request: NewAccountRequest) -> Result<AuthSession> {
        // 1. Validation: required fields
        let username =
            non_blank(request.username).ok_or_else(|| AppError::validation("username is required"))?;
        let email = non_blank(request.email)
            .map(|e| e.to_lowercase())
            .ok_or_else(|| AppError::validation("email is required"))?;
        let password = request
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::validation("password is required"))?;

        // 2. Uniqueness: username first, then email
        let by_username = bounded(
            self.call_timeout,
            "account lookup",
            self.accounts.find_by_username(&username),
        )
        .await?;
        if by_username.is_some() {
            debug!(%username, "rejecting create: username taken");
            return Err(AppError::conflict("username already exists"));
        }

        let by_email = bounded(
            self.call_timeout,
            "account lookup",
            self.accounts.find_by_email(&email),
        )
        .await?;
        if by_email.is_some() {
            debug!(%username, "rejecting create: email taken");
            return Err(AppError::conflict("email already exists"));
        }

        // 3. Credential: hash before anything is stored
        let password_hash = self.hasher.hash_password(&password).await?;

        // 4. Persistence: the unique index settles any race since step 2
        let account = AdminAccount {
            id: Uuid::now_v7(),
            username,
            email,
            password_hash,
            first_name: non_blank(request.first_name),
            last_name: non_blank(request.last_name),
            phone_number: non_blank(request.phone_number),
            created_at: Utc::now(),
        };
        bounded(
            self.call_timeout,
            "account insert",
            self.accounts.insert_account(account.clone()),
        )
        .await?;

        let token = self.tokens.issue(&account)?;
        info!(account_id = %account.id, username = %account.username, "admin account created");

        Ok(AuthSession {
            token,
            account: (&account).into(),
        })
    }

    /// Verifies a username/password pair. Empty strings count as missing.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::validation("username is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("password is required"));
        }

        let account = bounded(
            self.call_timeout,
            "account lookup",
            self.accounts.find_by_username(username),
        )
        .await?;

        let Some(account) = account else {
            debug!(%username, "login for unknown username");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        };

        if !self
            .hasher
            .verify_password(password, &account.password_hash)
            .await?
        {
            debug!(account_id = %account.id, "login with wrong password");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }

        let token = self.tokens.issue(&account)?;
        info!(account_id = %account.id, "admin logged in");

        Ok(AuthSession {
            token,
            account: (&account).into(),
        })
    }
}
