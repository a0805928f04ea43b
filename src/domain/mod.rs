//! # Domain Layer
//!
//! Core types of the chat server, independent of HTTP and of the MongoDB driver.
//!
//! ## Structure
//!
//! - **entities**: Documents (User, Chat, Message, Token), joined views and repository traits
//! - **value_objects**: Serde adapters shared by the entities
//!
//! ## Design Principles
//!
//! - Repository traits define data access contracts
//! - Denormalized relationship arrays are only changed through those contracts

pub mod entities;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
