//! Token Issuer
//!
//! Mints and verifies signed access tokens. The signing key is read once from
//! [`AuthSettings`] when the issuer is built and never changes afterwards.

use bson::oid::ObjectId;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::{AuthSettings, DEFAULT_ACCESS_TOKEN_LIFETIME_SECS};

/// Claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    pub user_id: String,
    pub user_name: String,
    /// Issuer
    pub iss: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token id, distinct for every issued token
    pub jti: String,
}

/// Token errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token expired")]
    Expired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token signing failed: {0}")]
    SigningFailure(String),
}

/// Issues and verifies HMAC-signed tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    lifetime: Duration,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        let lifetime_secs = if settings.access_token_lifetime_secs > 0 {
            settings.access_token_lifetime_secs
        } else {
            DEFAULT_ACCESS_TOKEN_LIFETIME_SECS
        };

        // Any HMAC family member is accepted; RSA/EC-signed tokens are not.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.set_issuer(&[settings.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(settings.secret.as_bytes()),
            issuer: settings.issuer.clone(),
            lifetime: Duration::seconds(lifetime_secs),
            validation,
        }
    }

    /// Lifetime applied to newly issued tokens.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Mint a token for the user, valid from now for the configured lifetime.
    pub fn generate(&self, user_id: &str, user_name: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let payload = TokenPayload {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            jti: ObjectId::new().to_hex(),
        };

        encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| TokenError::SigningFailure(e.to_string()))
    }

    /// Check signature, issuer and expiry, returning the embedded payload.
    pub fn verify(&self, token: &str) -> Result<TokenPayload, TokenError> {
        decode::<TokenPayload>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::InvalidAlgorithmName
                | ErrorKind::InvalidIssuer => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}
