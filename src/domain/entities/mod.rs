//! # Domain Entities
//!
//! Document entities of the chat server. Each maps to one MongoDB collection.
//!
//! ## Canonical Aggregates
//!
//! - **User**: account, password hash, and the denormalized `contacts`/`chats` sets
//! - **Chat**: a conversation between exactly two users, with a `lastMessage` pointer
//!
//! ## Owned Documents
//!
//! - **Message**: belongs to one chat and one sender
//! - **Token**: an issued session token, removed by login or by TTL expiry
//!
//! ## Views
//!
//! `UserView`, `ChatView` and `MessageView` are the joined read models the list
//! endpoints return. They are decoded from aggregation output, never written.
//!
//! ## Repository Traits
//!
//! Each entity has an associated repository trait defining data access operations.
//! These traits are implemented in the infrastructure layer, following the
//! dependency inversion principle.

mod chat;
mod message;
mod token;
mod user;

pub use chat::{Chat, ChatRepository, ChatView};
pub use message::{Message, MessageRepository, MessageView};
pub use token::{Token, TokenRepository, TokenType};
pub use user::{User, UserRepository, UserView};

#[cfg(test)]
pub use chat::MockChatRepository;
#[cfg(test)]
pub use message::MockMessageRepository;
#[cfg(test)]
pub use token::MockTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;
