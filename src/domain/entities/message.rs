//! Message entity and repository trait.
//!
//! Maps to the `messages` collection. Messages belong to one chat and one sender.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

use super::user::UserView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub text: String,

    /// Inline image payload (data URI)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub sent: bool,

    #[serde(default)]
    pub received: bool,

    #[serde(default)]
    pub system: bool,

    /// Sender
    pub user: ObjectId,

    pub chat: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// A user-sent message. `sent` is set, delivery is not yet acknowledged.
    pub fn new(chat_id: ObjectId, user_id: ObjectId, text: impl Into<String>, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            text: text.into(),
            image,
            sent: true,
            received: false,
            system: false,
            user: user_id,
            chat: chat_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Message with its sender joined in place of the id.
///
/// `user` is `None` when the sender account no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(default)]
    pub sent: bool,

    #[serde(default)]
    pub received: bool,

    #[serde(default)]
    pub system: bool,

    #[serde(default)]
    pub user: Option<UserView>,

    pub chat: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl MessageView {
    pub fn new(message: Message, sender: Option<UserView>) -> Self {
        Self {
            id: message.id,
            text: message.text,
            image: message.image,
            sent: message.sent,
            received: message.received,
            system: message.system,
            user: sender,
            chat: message.chat,
            created_at: message.created_at,
            updated_at: message.updated_at,
        }
    }
}

/// Repository trait for Message data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    /// Delete every message of a chat, returning how many were removed.
    async fn delete_by_chat(&self, chat_id: ObjectId) -> Result<u64, AppError>;

    /// Messages of a chat with their sender joined, newest first.
    async fn list_for_chat(
        &self,
        chat_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<MessageView>, AppError>;
}
