//! Relationship Coordinator
//!
//! The only writer of the denormalized relationship data: `users.contacts`,
//! `users.chats` and `chats.lastMessage`. Every write is a single-document
//! update; multi-document sequences run in a fixed order, and chat creation
//! undoes its own partial work when a later step fails.

use std::sync::Arc;

use bson::oid::ObjectId;

use crate::domain::{Chat, ChatRepository, Message, MessageRepository, UserRepository};
use crate::shared::error::AppError;

#[derive(Clone)]
pub struct RelationshipCoordinator {
    users: Arc<dyn UserRepository>,
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
}

impl RelationshipCoordinator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
    ) -> Self {
        Self { users, chats, messages }
    }

    /// Return the chat between the owner and `target_name`, creating it if needed.
    ///
    /// Creation order: insert the chat, then set-add its id to the owner and to
    /// the target. If either user update fails, the id is pulled from both
    /// users, the chat is deleted and the error that triggered the rollback is returned.
    pub async fn create_chat(
        &self,
        owner_id: ObjectId,
        target_name: &str,
        chat_name: &str,
    ) -> Result<Chat, AppError> {
        let target = self
            .users
            .find_by_name(target_name)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        if target.id == owner_id {
            return Err(AppError::validation("cannot start a chat with yourself"));
        }

        if let Some(existing) = self.chats.find_between(owner_id, target.id).await? {
            tracing::debug!(chat_id = %existing.id, "Chat already exists");
            return Ok(existing);
        }

        let chat = self
            .chats
            .create(&Chat::new(chat_name, owner_id, target.id))
            .await?;

        let linked = async {
            self.users.add_chat(owner_id, chat.id).await?;
            self.users.add_chat(target.id, chat.id).await
        }
        .await;

        if let Err(e) = linked {
            tracing::warn!(chat_id = %chat.id, error = %e, "Chat membership update failed, rolling back");
            self.unlink_chat(&chat).await;
            return Err(e);
        }

        tracing::info!(chat_id = %chat.id, owner_id = %owner_id, target_id = %target.id, "Chat created");
        Ok(chat)
    }

    /// Compensation for a half-created chat. Failures are logged, not returned,
    /// so the caller sees the error that triggered the rollback.
    async fn unlink_chat(&self, chat: &Chat) {
        for user_id in &chat.users {
            if let Err(e) = self.users.remove_chat(*user_id, chat.id).await {
                tracing::error!(chat_id = %chat.id, user_id = %user_id, error = %e, "Failed to pull chat from user");
            }
        }
        if let Err(e) = self.chats.delete(chat.id).await {
            tracing::error!(chat_id = %chat.id, error = %e, "Failed to delete orphan chat");
        }
    }

    /// Point the chat at `message_id`, or reset it with `None`.
    pub async fn set_last_message(
        &self,
        chat_id: ObjectId,
        message_id: Option<ObjectId>,
    ) -> Result<(), AppError> {
        self.chats.set_last_message(chat_id, message_id).await
    }

    /// Add `contact_name` to the owner's contacts. The contact's own list is untouched.
    pub async fn add_contact(&self, owner_id: ObjectId, contact_name: &str) -> Result<(), AppError> {
        let contact = self
            .users
            .find_by_name(contact_name)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        if contact.id == owner_id {
            return Err(AppError::validation("cannot add yourself as a contact"));
        }

        self.users.add_contact(owner_id, contact.id).await
    }

    /// Delete every message of the chat, then reset its last message.
    pub async fn clear_chat(&self, chat_id: ObjectId) -> Result<(), AppError> {
        let deleted = self.messages.delete_by_chat(chat_id).await?;
        self.set_last_message(chat_id, None).await?;

        tracing::info!(chat_id = %chat_id, deleted, "Chat cleared");
        Ok(())
    }

    /// Store a message from `sender_id` and make it the chat's last message.
    pub async fn send_message(
        &self,
        chat_id: ObjectId,
        sender_id: ObjectId,
        text: &str,
        image: Option<String>,
    ) -> Result<Message, AppError> {
        self.chat_for_member(chat_id, sender_id).await?;

        let message = self
            .messages
            .create(&Message::new(chat_id, sender_id, text, image))
            .await?;
        self.set_last_message(chat_id, Some(message.id)).await?;

        Ok(message)
    }

    /// The chat, if it exists and `user_id` is one of its members.
    ///
    /// Non-members get the same `NotFound` as a missing chat.
    pub async fn chat_for_member(&self, chat_id: ObjectId, user_id: ObjectId) -> Result<Chat, AppError> {
        self.chats
            .find_by_id(chat_id)
            .await?
            .filter(|chat| chat.has_member(&user_id))
            .ok_or_else(|| AppError::NotFound("chat not found".to_string()))
    }
}
