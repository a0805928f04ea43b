//! Auth Gate
//!
//! The single authorization decision for protected routes: the bearer token
//! must verify cryptographically *and* still be present in the token store.
//! Every failure collapses into one `Unauthorized`; the precise reason is
//! only logged.

use std::sync::Arc;

use bson::oid::ObjectId;

use crate::domain::TokenRepository;
use crate::shared::error::AppError;

use super::token_issuer::TokenIssuer;

/// Decoded caller identity attached to an authorized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: ObjectId,
    pub user_name: String,
}

#[derive(Clone)]
pub struct AuthGate {
    issuer: Arc<TokenIssuer>,
    tokens: Arc<dyn TokenRepository>,
}

impl AuthGate {
    pub fn new(issuer: Arc<TokenIssuer>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self { issuer, tokens }
    }

    /// Authorize a request from its raw `Authorization` header value.
    pub async fn authorize(&self, header: Option<&str>) -> Result<Identity, AppError> {
        let token = header
            .and_then(bearer_token)
            .ok_or_else(|| AppError::Unauthorized("missing or malformed bearer header".into()))?;

        let payload = self
            .issuer
            .verify(token)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        match self.tokens.exists(token).await {
            Ok(true) => {}
            Ok(false) => return Err(AppError::Unauthorized("token has been revoked".into())),
            Err(e) => {
                tracing::warn!(error = %e, "Token store lookup failed during authorization");
                return Err(AppError::Unauthorized("token store unavailable".into()));
            }
        }

        let user_id = ObjectId::parse_str(&payload.user_id)
            .map_err(|_| AppError::Unauthorized("token subject is not a valid id".into()))?;

        Ok(Identity {
            user_id,
            user_name: payload.user_name,
        })
    }
}

/// Extract the token from `Bearer <token>`.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
