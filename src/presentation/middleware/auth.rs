//! Authentication Middleware
//!
//! Runs the [`AuthGate`](crate::application::services::AuthGate) for protected
//! routes and attaches the caller's identity to the request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use bson::oid::ObjectId;

use crate::application::services::{AuthGate, Identity};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Authenticated user extension
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub user_name: String,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            user_name: identity.user_name,
        }
    }
}

/// Reject the request unless its bearer token verifies and is still stored.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let gate = AuthGate::new(state.issuer.clone(), state.tokens.clone());
    let identity = gate.authorize(header).await?;

    request.extensions_mut().insert(AuthUser::from(identity));

    Ok(next.run(request).await)
}
