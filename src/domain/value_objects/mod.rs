//! # Value Objects
//!
//! Small serde adapters shared by the document entities.

pub mod object_id;

pub use object_id::{is_nil, nullable_object_id};
