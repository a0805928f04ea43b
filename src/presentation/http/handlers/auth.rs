//! Authentication Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::dto::request::{LoginQuery, LoginRequest, RegisterRequest};
use crate::application::dto::response::{IdResponse, TokenResponse};
use crate::application::services::{AuthService, AuthServiceImpl};
use crate::presentation::http::extractors::ValidatedJson;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthServiceImpl {
    AuthServiceImpl::new(state.users.clone(), state.tokens.clone(), state.issuer.clone())
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<IdResponse>), AppError> {
    let user_id = auth_service(&state)
        .register(&body.name, &body.password, &body.avatar_uri)
        .await?;

    Ok((StatusCode::CREATED, Json(IdResponse::from(user_id))))
}

/// Login with credentials
///
/// Any previously issued access token of the user stops working.
pub async fn login(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
    ValidatedJson(body): ValidatedJson<LoginRequest>,
) -> Result<Response, AppError> {
    let token = auth_service(&state).login(&body.name, &body.password).await?;

    if query.is_raw() {
        Ok(token.into_response())
    } else {
        Ok(Json(TokenResponse { token }).into_response())
    }
}
