//! Token Repository Implementation
//!
//! MongoDB implementation of the TokenRepository trait. Tokens are stored as
//! issued; the unique `(userId, type)` index and the `createdAt` TTL index are
//! created at boot by [`crate::infrastructure::database::ensure_indexes`].

use std::time::Instant;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use mongodb::{Collection, Database};

use crate::domain::{Token, TokenRepository, TokenType};
use crate::infrastructure::database::{is_duplicate_key, TOKENS};
use crate::infrastructure::metrics::record_db_operation;
use crate::shared::error::AppError;

/// MongoDB token repository implementation.
#[derive(Clone)]
pub struct MongoTokenRepository {
    tokens: Collection<Token>,
}

impl MongoTokenRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            tokens: database.collection(TOKENS),
        }
    }
}

#[async_trait]
impl TokenRepository for MongoTokenRepository {
    async fn save(&self, token: &Token) -> Result<ObjectId, AppError> {
        let started = Instant::now();
        let result = self.tokens.insert_one(token).await;
        record_db_operation("insert_one", TOKENS, started);

        result.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict(format!(
                    "a live {} token already exists for this user",
                    token.token_type
                ))
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(token.id)
    }

    async fn delete_all_access(&self, user_id: ObjectId) -> Result<u64, AppError> {
        let filter = doc! { "userId": user_id, "type": TokenType::Access.as_str() };

        let started = Instant::now();
        let result = self.tokens.delete_many(filter).await;
        record_db_operation("delete_many", TOKENS, started);
        Ok(result?.deleted_count)
    }

    async fn exists(&self, encoded: &str) -> Result<bool, AppError> {
        let started = Instant::now();
        let token = self.tokens.find_one(doc! { "encoded": encoded }).await;
        record_db_operation("find_one", TOKENS, started);
        Ok(token?.is_some())
    }

    async fn count_for_user(&self, user_id: ObjectId, token_type: TokenType) -> Result<u64, AppError> {
        let filter = doc! { "userId": user_id, "type": token_type.as_str() };

        let started = Instant::now();
        let count = self.tokens.count_documents(filter).await;
        record_db_operation("count_documents", TOKENS, started);
        Ok(count?)
    }
}
