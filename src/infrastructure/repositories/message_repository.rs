//! Message Repository Implementation
//!
//! MongoDB implementation of the MessageRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use bson::doc;
use bson::oid::ObjectId;
use mongodb::{Collection, Database};

use crate::domain::{Message, MessageRepository, MessageView};
use crate::infrastructure::database::{pipeline, MESSAGES};
use crate::infrastructure::metrics::record_db_operation;
use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

use super::collect_views;

/// MongoDB message repository implementation.
#[derive(Clone)]
pub struct MongoMessageRepository {
    messages: Collection<Message>,
}

impl MongoMessageRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            messages: database.collection(MESSAGES),
        }
    }
}

#[async_trait]
impl MessageRepository for MongoMessageRepository {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let started = Instant::now();
        let result = self.messages.insert_one(message).await;
        record_db_operation("insert_one", MESSAGES, started);
        result?;
        Ok(message.clone())
    }

    async fn delete_by_chat(&self, chat_id: ObjectId) -> Result<u64, AppError> {
        let started = Instant::now();
        let result = self.messages.delete_many(doc! { "chat": chat_id }).await;
        record_db_operation("delete_many", MESSAGES, started);
        Ok(result?.deleted_count)
    }

    async fn list_for_chat(
        &self,
        chat_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<MessageView>, AppError> {
        let started = Instant::now();
        let cursor = self
            .messages
            .aggregate(pipeline::messages(chat_id, pagination))
            .await;
        record_db_operation("aggregate", MESSAGES, started);
        collect_views(cursor?, "message").await
    }
}
