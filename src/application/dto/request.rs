//! Request DTOs
//!
//! Data structures for API request bodies.

use serde::Deserialize;
use validator::Validate;

use crate::shared::validation::{validate_avatar_uri, validate_image_uri};

/// Registration request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "name must be 2-32 characters"))]
    pub name: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,

    #[validate(custom(function = "validate_avatar_uri"))]
    pub avatar_uri: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,

    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
}

/// `?raw=true` on login returns the bare token text.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub raw: Option<String>,
}

impl LoginQuery {
    pub fn is_raw(&self) -> bool {
        self.raw.as_deref() == Some("true")
    }
}

/// Add contact request
#[derive(Debug, Deserialize, Validate)]
pub struct AddContactRequest {
    #[validate(length(min = 2, message = "username must be at least 2 characters"))]
    pub username: String,
}

/// Create chat request
#[derive(Debug, Deserialize, Validate)]
pub struct NewChatRequest {
    /// Display name of the chat
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,

    /// Name of the other participant
    #[validate(length(min = 2, message = "username must be at least 2 characters"))]
    pub username: String,
}

/// Send message request
#[derive(Debug, Deserialize, Validate)]
pub struct NewMessageRequest {
    #[validate(length(min = 1, max = 4096, message = "text must be 1-4096 characters"))]
    pub text: String,

    #[validate(custom(function = "validate_image_uri"))]
    pub image: Option<String>,
}
