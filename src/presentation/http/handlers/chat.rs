//! Chat Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};

use crate::application::dto::request::NewChatRequest;
use crate::application::dto::response::{ChatResponse, ChatSummaryResponse};
use crate::presentation::http::extractors::{ChatId, ValidatedJson};
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::shared::pagination::{Pagination, PaginationQuery};
use crate::startup::AppState;

/// Create a chat with another user, or return the existing one
pub async fn new_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ValidatedJson(body): ValidatedJson<NewChatRequest>,
) -> Result<(StatusCode, Json<ChatResponse>), AppError> {
    let chat = state
        .coordinator()
        .create_chat(auth.user_id, &body.username, &body.name)
        .await?;

    Ok((StatusCode::CREATED, Json(chat.into())))
}

/// List chats, paginated
pub async fn list_chats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<ChatSummaryResponse>>, AppError> {
    render(&state, &auth, Pagination::from(&query)).await
}

/// List every chat
pub async fn list_all_chats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<ChatSummaryResponse>>, AppError> {
    render(&state, &auth, Pagination::all()).await
}

/// Delete all messages of a chat
pub async fn clear_chat(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ChatId(chat_id): ChatId,
) -> Result<StatusCode, AppError> {
    let coordinator = state.coordinator();
    coordinator.chat_for_member(chat_id, auth.user_id).await?;
    coordinator.clear_chat(chat_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn render(
    state: &AppState,
    auth: &AuthUser,
    pagination: Pagination,
) -> Result<Json<Vec<ChatSummaryResponse>>, AppError> {
    let chats = state.populator().list_chats(auth.user_id, pagination).await?;
    Ok(Json(chats.into_iter().map(ChatSummaryResponse::from).collect()))
}
