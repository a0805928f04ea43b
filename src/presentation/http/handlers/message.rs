//! Message Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::application::dto::request::NewMessageRequest;
use crate::application::dto::response::{IdResponse, MessageResponse};
use crate::presentation::http::extractors::{ChatId, ValidatedJson};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::{Pagination, PaginationQuery};
use crate::startup::AppState;

/// Send a message into a chat
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ChatId(chat_id): ChatId,
    ValidatedJson(body): ValidatedJson<NewMessageRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let message = state
        .coordinator()
        .send_message(chat_id, auth.user_id, &body.text, body.image)
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse::from(message.id))))
}

/// List messages of a chat, paginated
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ChatId(chat_id): ChatId,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    render(&state, &auth, chat_id, Pagination::from(&query)).await
}

/// List every message of a chat
pub async fn list_all_messages(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ChatId(chat_id): ChatId,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    render(&state, &auth, chat_id, Pagination::all()).await
}

async fn render(
    state: &AppState,
    auth: &AuthUser,
    chat_id: bson::oid::ObjectId,
    pagination: Pagination,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    state.coordinator().chat_for_member(chat_id, auth.user_id).await?;

    let messages = state.populator().list_messages(chat_id, pagination).await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}
