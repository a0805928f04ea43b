//! User Repository Implementation
//!
//! MongoDB implementation of the UserRepository trait.

use std::time::Instant;

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};
use mongodb::{Collection, Database};

use crate::domain::{User, UserRepository, UserView};
use crate::infrastructure::database::{is_duplicate_key, pipeline, USERS};
use crate::infrastructure::metrics::record_db_operation;
use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

use super::collect_views;

/// MongoDB user repository implementation.
#[derive(Clone)]
pub struct MongoUserRepository {
    users: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            users: database.collection(USERS),
        }
    }

    /// Apply a single-document update, mapping "no match" to `NotFound`.
    async fn update_existing(&self, id: ObjectId, update: Document, operation: &str) -> Result<(), AppError> {
        let started = Instant::now();
        let result = self.users.update_one(doc! { "_id": id }, update).await;
        record_db_operation(operation, USERS, started);

        if result?.matched_count == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        let started = Instant::now();
        let user = self.users.find_one(doc! { "_id": id }).await;
        record_db_operation("find_one", USERS, started);
        Ok(user?)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        let started = Instant::now();
        let user = self.users.find_one(doc! { "name": name }).await;
        record_db_operation("find_one", USERS, started);
        Ok(user?)
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let started = Instant::now();
        let result = self.users.insert_one(user).await;
        record_db_operation("insert_one", USERS, started);

        result.map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict("name already taken".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(user.clone())
    }

    async fn add_contact(&self, owner_id: ObjectId, contact_id: ObjectId) -> Result<(), AppError> {
        let update = doc! {
            "$addToSet": { "contacts": contact_id },
            "$set": { "updatedAt": bson::DateTime::now() },
        };
        self.update_existing(owner_id, update, "add_contact").await
    }

    async fn add_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError> {
        let update = doc! {
            "$addToSet": { "chats": chat_id },
            "$set": { "updatedAt": bson::DateTime::now() },
        };
        self.update_existing(user_id, update, "add_chat").await
    }

    async fn remove_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError> {
        let started = Instant::now();
        let result = self
            .users
            .update_one(doc! { "_id": user_id }, doc! { "$pull": { "chats": chat_id } })
            .await;
        record_db_operation("remove_chat", USERS, started);
        result?;
        Ok(())
    }

    async fn list_contacts(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<UserView>, AppError> {
        let started = Instant::now();
        let cursor = self
            .users
            .aggregate(pipeline::contacts(user_id, pagination))
            .await;
        record_db_operation("aggregate", USERS, started);
        collect_views(cursor?, "contact").await
    }
}
