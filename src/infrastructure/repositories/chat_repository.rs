//! Chat Repository Implementation
//!
//! MongoDB implementation of the ChatRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Bson};
use mongodb::{Collection, Database};

use crate::domain::{Chat, ChatRepository, ChatView};
use crate::infrastructure::database::{pipeline, CHATS};
use crate::infrastructure::metrics::record_db_operation;
use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

use super::collect_views;

/// MongoDB chat repository implementation.
#[derive(Clone)]
pub struct MongoChatRepository {
    chats: Collection<Chat>,
}

impl MongoChatRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            chats: database.collection(CHATS),
        }
    }
}

#[async_trait]
impl ChatRepository for MongoChatRepository {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Chat>, AppError> {
        let started = Instant::now();
        let chat = self.chats.find_one(doc! { "_id": id }).await;
        record_db_operation("find_one", CHATS, started);
        Ok(chat?)
    }

    async fn find_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Chat>, AppError> {
        // `$all` + `$size` matches the pair whatever order it was stored in.
        let filter = doc! { "users": { "$all": [a, b], "$size": 2 } };

        let started = Instant::now();
        let chat = self.chats.find_one(filter).await;
        record_db_operation("find_one", CHATS, started);
        Ok(chat?)
    }

    async fn create(&self, chat: &Chat) -> Result<Chat, AppError> {
        let started = Instant::now();
        let result = self.chats.insert_one(chat).await;
        record_db_operation("insert_one", CHATS, started);
        result?;
        Ok(chat.clone())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        let started = Instant::now();
        let result = self.chats.delete_one(doc! { "_id": id }).await;
        record_db_operation("delete_one", CHATS, started);
        result?;
        Ok(())
    }

    async fn set_last_message(
        &self,
        id: ObjectId,
        message_id: Option<ObjectId>,
    ) -> Result<(), AppError> {
        let last_message = message_id.map(Bson::ObjectId).unwrap_or(Bson::Null);
        let update = doc! {
            "$set": {
                "lastMessage": last_message,
                "updatedAt": bson::DateTime::now(),
            }
        };

        let started = Instant::now();
        let result = self.chats.update_one(doc! { "_id": id }, update).await;
        record_db_operation("set_last_message", CHATS, started);

        if result?.matched_count == 0 {
            return Err(AppError::NotFound(format!("Chat with id {} not found", id)));
        }
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<ChatView>, AppError> {
        let started = Instant::now();
        let cursor = self
            .chats
            .aggregate(pipeline::chats(user_id, pagination))
            .await;
        record_db_operation("aggregate", CHATS, started);
        collect_views(cursor?, "chat").await
    }
}
