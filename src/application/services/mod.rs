//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **TokenIssuer**: signs and verifies access tokens
//! - **AuthGate**: verification plus revocation check for protected routes
//! - **AuthService**: registration and login
//! - **RelationshipCoordinator**: every write to contacts, chat membership and last messages
//! - **Populator**: paginated joined views for the list endpoints

pub mod auth_gate;
pub mod auth_service;
pub mod populator;
pub mod relationship_coordinator;
pub mod token_issuer;

pub use auth_gate::{AuthGate, Identity};
pub use auth_service::{AuthService, AuthServiceImpl};
pub use populator::Populator;
pub use relationship_coordinator::RelationshipCoordinator;
pub use token_issuer::{TokenError, TokenIssuer, TokenPayload};
