//! Token entity and repository trait.
//!
//! Maps to the `tokens` collection. Every issued token is stored, so a token
//! that is missing from the collection is revoked no matter what its claims say.
//! Documents are removed by the TTL index on `createdAt`.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub user_id: ObjectId,

    /// Owner name at issue time, kept for auditing.
    pub username: String,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    /// The signed token text as handed to the client.
    pub encoded: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Token {
    pub fn access(user_id: ObjectId, username: impl Into<String>, encoded: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            user_id,
            username: username.into(),
            token_type: TokenType::Access,
            encoded: encoded.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persistence and revocation queries for issued tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a token. Unique on (userId, type): a second live token of the same
    /// type for the same user is a `Conflict`.
    async fn save(&self, token: &Token) -> Result<ObjectId, AppError>;

    /// Remove every access token of the user.
    async fn delete_all_access(&self, user_id: ObjectId) -> Result<u64, AppError>;

    /// Whether this exact token text is still stored.
    async fn exists(&self, encoded: &str) -> Result<bool, AppError>;

    /// Number of stored tokens of a type for the user.
    async fn count_for_user(&self, user_id: ObjectId, token_type: TokenType) -> Result<u64, AppError>;
}
