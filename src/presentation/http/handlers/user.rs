//! User Handlers

use axum::{extract::State, Extension, Json};

use crate::application::dto::response::ProfileResponse;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Get current user
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = state.populator().profile(auth.user_id).await?;
    Ok(Json(user.into()))
}
