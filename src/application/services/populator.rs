//! Populator
//!
//! Read side of the relationships: paginated, joined views for the list
//! endpoints and the caller's own profile. Never writes.

use std::sync::Arc;

use bson::oid::ObjectId;

use crate::domain::{ChatRepository, ChatView, MessageRepository, MessageView, User, UserRepository, UserView};
use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

#[derive(Clone)]
pub struct Populator {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl Populator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self { users, chats, messages }
    }

    pub async fn profile(&self, user_id: ObjectId) -> Result<User, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))
    }

    /// Contacts sorted by name.
    pub async fn list_contacts(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<UserView>, AppError> {
        self.users.list_contacts(user_id, pagination).await
    }

    /// Chats with their last message, most recently active first.
    pub async fn list_chats(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<ChatView>, AppError> {
        self.chats.list_for_user(user_id, pagination).await
    }

    /// Messages with their sender, newest first.
    pub async fn list_messages(
        &self,
        chat_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<MessageView>, AppError> {
        self.messages.list_for_chat(chat_id, pagination).await
    }
}
