//! # sChat Server Library
//!
//! Backend for a two-party chat application:
//! - RESTful HTTP API (axum)
//! - MongoDB for persistent storage
//! - Bearer tokens that are both signed and stored, so a new login revokes
//!   the previous session
//!
//! ## Architecture
//!
//! The crate follows Clean Architecture principles:
//!
//! - **Domain Layer**: Entities, views and repository traits
//! - **Application Layer**: Token issuing, auth, relationship coordination, DTOs
//! - **Infrastructure Layer**: MongoDB connection, pipelines, repositories, metrics
//! - **Presentation Layer**: HTTP routes, handlers, extractors and middleware
//!
//! ## Module Structure
//!
//! ```text
//! schat_server/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, repository traits
//! +-- application/    Services and DTOs
//! +-- infrastructure/ MongoDB and metrics
//! +-- presentation/   HTTP routes and middleware
//! +-- shared/         Errors, pagination, validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
