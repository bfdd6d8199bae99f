//! # lf-auth-simple
//!
//! Argon2-based implementation of `CredentialHasher` and an HS256 JWT
//! implementation of `TokenIssuer`.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use lf_core::error::{AppError, Result};
use lf_core::models::{AdminAccount, TokenClaims};
use lf_core::traits::{CredentialHasher, TokenIssuer};

/// Argon2id with the crate's default parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        // Hashing is deliberately slow; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
        })
        .await
        .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed_hash = match PasswordHash::new(&hash) {
                Ok(p) => p,
                Err(_) => {
                    tracing::warn!("stored password hash is not a valid PHC string");
                    return false;
                }
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .map_err(|e| AppError::internal(format!("verification task failed: {e}")))
    }
}

/// Issues and verifies HS256 bearer tokens.
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, account: &AdminAccount) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = TokenClaims {
            sub: account.id,
            username: account.username.clone(),
            iat,
            exp: iat + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AppError::unauthorized("invalid or expired token")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn account() -> AdminAccount {
        AdminAccount {
            id: Uuid::now_v7(),
            username: "alice01".into(),
            email: "alice@example.com".into(),
            password_hash: String::new(),
            first_name: None,
            last_name: None,
            phone_number: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash_password("correct horse").await.unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("correct horse"));
        assert!(hasher.verify_password("correct horse", &hash).await.unwrap());
        assert!(!hasher.verify_password("wrong horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_a_mismatch() {
        assert!(!Argon2Hasher.verify_password("pw", "not-a-hash").await.unwrap());
    }

    #[test]
    fn issued_tokens_verify_and_carry_the_account() {
        let issuer = JwtTokenIssuer::new(b"test-secret", 3600);
        let account = account();
        let token = issuer.issue(&account).unwrap();

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.username, "alice01");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn foreign_and_expired_tokens_are_rejected() {
        let issuer = JwtTokenIssuer::new(b"test-secret", 3600);
        let other = JwtTokenIssuer::new(b"another-secret", 3600);
        let expired = JwtTokenIssuer::new(b"test-secret", -3600);

        let forged = other.issue(&account()).unwrap();
        let stale = expired.issue(&account()).unwrap();

        assert!(matches!(issuer.verify(&forged), Err(AppError::Unauthorized(_))));
        assert!(matches!(issuer.verify(&stale), Err(AppError::Unauthorized(_))));
        assert!(matches!(issuer.verify("not.a.jwt"), Err(AppError::Unauthorized(_))));
    }
}
