//! Response DTOs
//!
//! Data structures for API response bodies. Ids are rendered as hex strings
//! and timestamps as RFC 3339.

use bson::oid::ObjectId;
use serde::Serialize;

use crate::domain::{Chat, ChatView, Message, MessageView, User, UserView};

fn hex_ids(ids: &[ObjectId]) -> Vec<String> {
    ids.iter().map(|id| id.to_hex()).collect()
}

/// `{ "id": ... }` for created resources
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: String,
}

impl From<ObjectId> for IdResponse {
    fn from(id: ObjectId) -> Self {
        Self { id: id.to_hex() }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller's own account, as returned by `/user/me`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub avatar_uri: String,
    pub contacts: Vec<String>,
    pub chats: Vec<String>,
    pub created_at: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            contacts: hex_ids(&user.contacts),
            chats: hex_ids(&user.chats),
            name: user.name,
            avatar_uri: user.avatar_uri,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Public user info
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub avatar_uri: String,
    pub created_at: String,
}

impl From<UserView> for UserResponse {
    fn from(view: UserView) -> Self {
        Self {
            id: view.id.to_hex(),
            name: view.name,
            avatar_uri: view.avatar_uri,
            created_at: view.created_at.to_rfc3339(),
        }
    }
}

/// A message as embedded in a chat listing; the sender stays an id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessageResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub sent: bool,
    pub received: bool,
    pub system: bool,
    pub user: String,
    pub created_at: String,
}

impl From<Message> for LastMessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.to_hex(),
            text: message.text,
            image: message.image,
            sent: message.sent,
            received: message.received,
            system: message.system,
            user: message.user.to_hex(),
            created_at: message.created_at.to_rfc3339(),
        }
    }
}

/// A chat as stored: members are ids. Returned by `PUT /chat/new`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub id: String,
    pub name: String,
    pub muted: bool,
    pub icon_uri: String,
    pub users: Vec<String>,
    pub last_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Chat> for ChatResponse {
    fn from(chat: Chat) -> Self {
        Self {
            id: chat.id.to_hex(),
            users: hex_ids(&chat.users),
            last_message: chat.last_message.map(|id| id.to_hex()),
            name: chat.name,
            muted: chat.muted,
            icon_uri: chat.icon_uri,
            created_at: chat.created_at.to_rfc3339(),
            updated_at: chat.updated_at.to_rfc3339(),
        }
    }
}

/// A chat listing entry with its members and last message joined.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummaryResponse {
    pub id: String,
    pub name: String,
    pub muted: bool,
    pub icon_uri: String,
    pub users: Vec<UserResponse>,
    pub last_message: Option<LastMessageResponse>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ChatView> for ChatSummaryResponse {
    fn from(view: ChatView) -> Self {
        Self {
            id: view.id.to_hex(),
            users: view.users.into_iter().map(UserResponse::from).collect(),
            name: view.name,
            muted: view.muted,
            icon_uri: view.icon_uri,
            last_message: view.last_message.map(LastMessageResponse::from),
            created_at: view.created_at.to_rfc3339(),
            updated_at: view.updated_at.to_rfc3339(),
        }
    }
}

/// Message with its sender
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub sent: bool,
    pub received: bool,
    pub system: bool,
    pub user: Option<UserResponse>,
    pub chat: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<MessageView> for MessageResponse {
    fn from(view: MessageView) -> Self {
        Self {
            id: view.id.to_hex(),
            text: view.text,
            image: view.image,
            sent: view.sent,
            received: view.received,
            system: view.system,
            user: view.user.map(UserResponse::from),
            chat: view.chat.to_hex(),
            created_at: view.created_at.to_rfc3339(),
            updated_at: view.updated_at.to_rfc3339(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub server: &'static str,
}

/// Readiness check response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub server: &'static str,
    pub datastore: &'static str,
}
