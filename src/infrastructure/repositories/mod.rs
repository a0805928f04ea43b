//! Repository Implementations
//!
//! MongoDB implementations of domain repository traits.
//!
//! ## Available Repositories
//!
//! - **MongoUserRepository** - accounts, contacts and chat membership arrays
//! - **MongoChatRepository** - chats and their last-message pointer
//! - **MongoMessageRepository** - message storage and bulk clearing
//! - **MongoTokenRepository** - issued tokens and revocation checks
//!
//! List queries run the aggregation pipelines from
//! [`crate::infrastructure::database::pipeline`] and decode every result into
//! a typed view. A document that does not match its view is an error, never
//! a silently skipped row.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use crate::infrastructure::repositories::{MongoUserRepository, MongoTokenRepository};
//!
//! async fn setup_repositories(database: mongodb::Database) {
//!     let users = MongoUserRepository::new(&database);
//!     let tokens = MongoTokenRepository::new(&database);
//! }
//! ```

pub mod chat_repository;
pub mod message_repository;
pub mod token_repository;
pub mod user_repository;

pub use chat_repository::MongoChatRepository;
pub use message_repository::MongoMessageRepository;
pub use token_repository::MongoTokenRepository;
pub use user_repository::MongoUserRepository;

use bson::Document;
use futures::TryStreamExt;
use mongodb::Cursor;
use serde::de::DeserializeOwned;

use crate::shared::error::AppError;

/// Drain an aggregation cursor, decoding each document into `T`.
pub(crate) async fn collect_views<T: DeserializeOwned>(
    mut cursor: Cursor<Document>,
    view: &str,
) -> Result<Vec<T>, AppError> {
    let mut items = Vec::new();
    while let Some(document) = cursor.try_next().await? {
        let item = bson::from_document(document)
            .map_err(|e| AppError::Internal(format!("Failed to decode {}: {}", view, e)))?;
        items.push(item);
    }
    Ok(items)
}
