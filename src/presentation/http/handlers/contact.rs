//! Contact Handlers

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::application::dto::request::AddContactRequest;
use crate::application::dto::response::UserResponse;
use crate::presentation::http::extractors::ValidatedJson;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::{Pagination, PaginationQuery};
use crate::startup::AppState;

/// Add another user to the caller's contacts
pub async fn add_contact(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<AddContactRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .coordinator()
        .add_contact(auth.user_id, &body.username)
        .await?;

    Ok(Json(json!({})))
}

/// List contacts, paginated
pub async fn list_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    render(&state, &auth, Pagination::from(&query)).await
}

/// List every contact
pub async fn list_all_contacts(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    render(&state, &auth, Pagination::all()).await
}

async fn render(
    state: &AppState,
    auth: &AuthUser,
    pagination: Pagination,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let contacts = state
        .populator()
        .list_contacts(auth.user_id, pagination)
        .await?;

    Ok(Json(contacts.into_iter().map(UserResponse::from).collect()))
}
