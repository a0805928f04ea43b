//! Custom Extractors
//!
//! Axum extractors for request parsing. Every rejection is rendered through
//! [`AppError`], so malformed input gets the same 422 envelope as a failed
//! validation rule.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use bson::oid::ObjectId;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::shared::error::AppError;
use crate::shared::validation::{parse_object_id, validation_error};

const INVALID_BODY: &str = "invalid request body";

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation {
                message: INVALID_BODY.to_string(),
                details: vec![rejection.body_text()],
            })?;

        value
            .validate()
            .map_err(|errors| validation_error(INVALID_BODY, errors))?;

        Ok(Self(value))
    }
}

/// `{chatId}` path segment parsed as an ObjectId.
#[derive(Debug, Clone, Copy)]
pub struct ChatId(pub ObjectId);

impl<S> FromRequestParts<S> for ChatId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::validation("invalid chatId"))?;

        parse_object_id("chatId", &raw).map(Self)
    }
}
