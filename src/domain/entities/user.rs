//! User entity and repository trait.
//!
//! Maps to the `users` collection.

use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;
use crate::shared::pagination::Pagination;

/// Represents a user account in the chat system.
///
/// Document shape:
/// - _id: ObjectId
/// - name: string, unique index
/// - avatarUri: string
/// - hash: Argon2 password hash
/// - contacts: [ObjectId], maintained with `$addToSet`
/// - chats: [ObjectId], maintained with `$addToSet`
/// - createdAt / updatedAt: date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub avatar_uri: String,

    /// Argon2 password hash
    #[serde(rename = "hash")]
    pub password_hash: String,

    #[serde(default)]
    pub contacts: Vec<ObjectId>,

    #[serde(default)]
    pub chats: Vec<ObjectId>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh account with empty relationship sets.
    pub fn new(name: impl Into<String>, avatar_uri: impl Into<String>, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: name.into(),
            avatar_uri: avatar_uri.into(),
            password_hash,
            contacts: Vec::new(),
            chats: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_contact(&self, id: &ObjectId) -> bool {
        self.contacts.contains(id)
    }

    pub fn is_in_chat(&self, chat_id: &ObjectId) -> bool {
        self.chats.contains(chat_id)
    }
}

/// Public projection of a user, as joined into contact lists and message senders.
///
/// The password hash is projected out before this is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub name: String,

    #[serde(default)]
    pub avatar_uri: String,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar_uri: user.avatar_uri.clone(),
            created_at: user.created_at,
        }
    }
}

/// Repository trait for User data access operations.
///
/// Relationship arrays are only mutated through the set-style methods here,
/// so they never hold duplicates.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;

    /// Find a user by exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError>;

    /// Insert a new user. A taken name is a `Conflict`.
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Set-add `contact_id` to the owner's contacts. `NotFound` if the owner is gone.
    async fn add_contact(&self, owner_id: ObjectId, contact_id: ObjectId) -> Result<(), AppError>;

    /// Set-add `chat_id` to the user's chats. `NotFound` if the user is gone.
    async fn add_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError>;

    /// Pull `chat_id` from the user's chats. Missing users are ignored.
    async fn remove_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError>;

    /// Contacts of a user joined into public views, sorted by name.
    async fn list_contacts(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<UserView>, AppError>;
}
