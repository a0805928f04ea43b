//! Chat entity and repository trait.
//!
//! Maps to the `chats` collection. A chat always joins exactly two distinct users
//! and is unique per unordered pair.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::nullable_object_id;
use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

use super::message::Message;
use super::user::UserView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub icon_uri: String,

    /// Exactly two member ids: `[owner, target]`.
    pub users: Vec<ObjectId>,

    /// Most recent message, `None` when the chat is empty or was cleared.
    #[serde(default, with = "nullable_object_id")]
    pub last_message: Option<ObjectId>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new(name: impl Into<String>, owner_id: ObjectId, target_id: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            muted: false,
            icon_uri: String::new(),
            users: vec![owner_id, target_id],
            last_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_member(&self, user_id: &ObjectId) -> bool {
        self.users.contains(user_id)
    }

    /// Whether this chat joins exactly `a` and `b`, in either order.
    pub fn is_between(&self, a: &ObjectId, b: &ObjectId) -> bool {
        self.users.len() == 2 && self.has_member(a) && self.has_member(b)
    }
}

/// Chat with its members and last message joined in place of their ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatView {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub muted: bool,

    #[serde(default)]
    pub icon_uri: String,

    /// Public views of the members, secrets projected out.
    pub users: Vec<UserView>,

    #[serde(default)]
    pub last_message: Option<Message>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ChatView {
    pub fn new(chat: Chat, users: Vec<UserView>, last_message: Option<Message>) -> Self {
        Self {
            id: chat.id,
            name: chat.name,
            muted: chat.muted,
            icon_uri: chat.icon_uri,
            users,
            last_message,
            created_at: chat.created_at,
            updated_at: chat.updated_at,
        }
    }
}

/// Repository trait for Chat data access operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Chat>, AppError>;

    /// Find the chat joining `a` and `b`, regardless of the order they were stored in.
    async fn find_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Chat>, AppError>;

    async fn create(&self, chat: &Chat) -> Result<Chat, AppError>;

    async fn delete(&self, id: ObjectId) -> Result<(), AppError>;

    /// Point the chat at a new last message, or reset it with `None`.
    /// `NotFound` if the chat does not exist.
    async fn set_last_message(
        &self,
        id: ObjectId,
        message_id: Option<ObjectId>,
    ) -> Result<(), AppError>;

    /// Chats of a user with members and last message joined, most recently active first.
    async fn list_for_user(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<ChatView>, AppError>;
}
