//! Authentication Service
//!
//! Registration and login. Login enforces a single live access token per
//! user: every stored access token is deleted before the new one is saved.
//! Unknown names and wrong passwords fail the same way.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use bson::oid::ObjectId;

use crate::domain::{Token, TokenRepository, User, UserRepository};
use crate::shared::error::AppError;

use super::token_issuer::TokenIssuer;

/// Delete-then-save rounds a login gets before giving up on a contended token slot.
const MAX_SAVE_ATTEMPTS: u32 = 3;

/// Authentication service trait for dependency injection
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account, returning its id.
    async fn register(&self, name: &str, password: &str, avatar_uri: &str) -> Result<ObjectId, AppError>;

    /// Check credentials and issue a fresh access token.
    async fn login(&self, name: &str, password: &str) -> Result<String, AppError>;
}

/// AuthService implementation
pub struct AuthServiceImpl {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    issuer: Arc<TokenIssuer>,
}

impl AuthServiceImpl {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tokens: Arc<dyn TokenRepository>,
        issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self { users, tokens, issuer }
    }

    /// Hash a password using Argon2id
    fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Verify a password against its hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, name: &str, password: &str, avatar_uri: &str) -> Result<ObjectId, AppError> {
        if self.users.find_by_name(name).await?.is_some() {
            return Err(AppError::Conflict("name already taken".to_string()));
        }

        let user = User::new(name, avatar_uri, Self::hash_password(password)?);

        // The unique index still catches a concurrent registration of the same name.
        let created = self.users.create(&user).await?;

        tracing::info!(user_id = %created.id, "User registered");
        Ok(created.id)
    }

    async fn login(&self, name: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find_by_name(name)
            .await?
            .ok_or_else(|| AppError::Unauthorized("no user with this name".to_string()))?;

        if !Self::verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized("wrong password".to_string()));
        }

        let encoded = self
            .issuer
            .generate(&user.id.to_hex(), &user.name)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let token = Token::access(user.id, user.name.as_str(), encoded.as_str());
        let mut attempt = 1;
        loop {
            let revoked = self.tokens.delete_all_access(user.id).await?;
            match self.tokens.save(&token).await {
                Ok(_) => {
                    tracing::info!(user_id = %user.id, revoked, "User logged in");
                    return Ok(encoded);
                }
                // A concurrent login stored its token between our delete and save
                Err(AppError::Conflict(reason)) if attempt < MAX_SAVE_ATTEMPTS => {
                    tracing::debug!(user_id = %user.id, %reason, "Access token slot taken, retrying");
                    attempt += 1;
                }
                Err(AppError::Conflict(reason)) => {
                    return Err(AppError::Internal(format!(
                        "access token for {} still taken after {} attempts: {}",
                        user.id, attempt, reason
                    )));
                }
                Err(e) => return Err(e),
            }
        }
    }
}
