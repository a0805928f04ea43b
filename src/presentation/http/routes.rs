//! Route Configuration
//!
//! Configures all HTTP routes for the API together with the middleware stack.

use std::time::Duration;

use axum::{
    http::{header, HeaderName, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{
    auth_middleware, create_cors_layer, create_security_headers_layer, track_metrics,
};
use crate::shared::error::AppError;
use crate::startup::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let settings = state.settings.clone();
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health-check", get(handlers::health::health_check))
        .route("/ping", get(handlers::health::health_check))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .fallback(not_found)
        .layer(middleware::from_fn(track_metrics))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    Duration::from_secs(settings.server.request_timeout_secs),
                ))
                .layer(create_cors_layer(&settings.cors))
                .layer(CompressionLayer::new()),
        )
        // Outermost, so even timeouts and rejections carry the headers
        .layer(create_security_headers_layer(settings.is_production()))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> Result<impl IntoResponse, AppError> {
    let body = metrics::gather_metrics().map_err(|e| AppError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    ))
}

async fn not_found() -> AppError {
    AppError::NotFound("route not found".into())
}

/// `/api` routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(protected_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
}

/// Everything that needs a live access token
fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/user/me", get(handlers::user::me))
        .route("/user/contact/add", put(handlers::contact::add_contact))
        .route("/user/contact/list", get(handlers::contact::list_contacts))
        .route("/user/contact/list/all", get(handlers::contact::list_all_contacts))
        .route("/chat/new", put(handlers::chat::new_chat))
        .route("/chat/list", get(handlers::chat::list_chats))
        .route("/chat/list/all", get(handlers::chat::list_all_chats))
        .route("/chat/{chatId}/clear", delete(handlers::chat::clear_chat))
        .route("/message/{chatId}/new", put(handlers::message::send_message))
        .route("/message/{chatId}/list", get(handlers::message::list_messages))
        .route("/message/{chatId}/list/all", get(handlers::message::list_all_messages))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
