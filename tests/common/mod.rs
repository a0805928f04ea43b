//! Common Test Utilities
//!
//! In-memory repositories with the same set/unique/sort semantics as the
//! MongoDB ones, and a `TestApp` that drives the full router with `oneshot`.

#![allow(dead_code)]

use std::cmp::Reverse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bson::oid::ObjectId;
use chrono::Utc;
use serde_json::Value;
use tower::ServiceExt;

use schat_server::application::services::TokenIssuer;
use schat_server::config::{
    AuthSettings, CorsSettings, DatabaseSettings, ServerSettings, Settings, DEFAULT_TOKEN_ISSUER,
};
use schat_server::domain::{
    Chat, ChatRepository, ChatView, Message, MessageRepository, MessageView, Token,
    TokenRepository, TokenType, User, UserRepository, UserView,
};
use schat_server::infrastructure::database::DatastoreProbe;
use schat_server::shared::error::AppError;
use schat_server::shared::pagination::Pagination;
use schat_server::startup::{build_router, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";
pub const AVATAR: &str = "https://example.com/avatar.png";
pub const PASSWORD: &str = "s3cret-pass";

fn page<T>(items: Vec<T>, pagination: Pagination) -> Vec<T> {
    let skip = pagination.skip().unwrap_or(0) as usize;
    let iter = items.into_iter().skip(skip);
    match pagination.limit() {
        Some(limit) => iter.take(limit as usize).collect(),
        None => iter.collect(),
    }
}

/// Shared in-memory datastore
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub chats: Mutex<Vec<Chat>>,
    pub messages: Mutex<Vec<Message>>,
    pub tokens: Mutex<Vec<Token>>,
}

impl MemoryStore {
    pub fn user_named(&self, name: &str) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.name == name).cloned()
    }

    pub fn chat(&self, id: ObjectId) -> Option<Chat> {
        self.chats.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    pub fn message_count(&self, chat_id: ObjectId) -> usize {
        self.messages.lock().unwrap().iter().filter(|m| m.chat == chat_id).count()
    }

    fn view_of(&self, id: ObjectId) -> Option<UserView> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .map(UserView::from)
    }
}

pub struct MemoryUsers(pub Arc<MemoryStore>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.0.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, AppError> {
        Ok(self.0.user_named(name))
    }

    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.0.users.lock().unwrap();
        if users.iter().any(|u| u.name == user.name) {
            return Err(AppError::Conflict("name already taken".into()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn add_contact(&self, owner_id: ObjectId, contact_id: ObjectId) -> Result<(), AppError> {
        let mut users = self.0.users.lock().unwrap();
        let owner = users
            .iter_mut()
            .find(|u| u.id == owner_id)
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;
        if !owner.contacts.contains(&contact_id) {
            owner.contacts.push(contact_id);
        }
        owner.updated_at = Utc::now();
        Ok(())
    }

    async fn add_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError> {
        let mut users = self.0.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| AppError::NotFound("user not found".into()))?;
        if !user.chats.contains(&chat_id) {
            user.chats.push(chat_id);
        }
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_chat(&self, user_id: ObjectId, chat_id: ObjectId) -> Result<(), AppError> {
        if let Some(user) = self.0.users.lock().unwrap().iter_mut().find(|u| u.id == user_id) {
            user.chats.retain(|c| *c != chat_id);
        }
        Ok(())
    }

    async fn list_contacts(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<UserView>, AppError> {
        let contact_ids = match self.find_by_id(user_id).await? {
            Some(user) => user.contacts,
            None => return Ok(Vec::new()),
        };

        let mut views: Vec<UserView> = contact_ids
            .into_iter()
            .filter_map(|id| self.0.view_of(id))
            .collect();
        views.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(page(views, pagination))
    }
}

pub struct MemoryChats(pub Arc<MemoryStore>);

#[async_trait]
impl ChatRepository for MemoryChats {
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Chat>, AppError> {
        Ok(self.0.chat(id))
    }

    async fn find_between(&self, a: ObjectId, b: ObjectId) -> Result<Option<Chat>, AppError> {
        Ok(self
            .0
            .chats
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.is_between(&a, &b))
            .cloned())
    }

    async fn create(&self, chat: &Chat) -> Result<Chat, AppError> {
        self.0.chats.lock().unwrap().push(chat.clone());
        Ok(chat.clone())
    }

    async fn delete(&self, id: ObjectId) -> Result<(), AppError> {
        self.0.chats.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }

    async fn set_last_message(
        &self,
        id: ObjectId,
        message_id: Option<ObjectId>,
    ) -> Result<(), AppError> {
        let mut chats = self.0.chats.lock().unwrap();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound("chat not found".into()))?;
        chat.last_message = message_id;
        chat.updated_at = Utc::now();
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<ChatView>, AppError> {
        let mut chats: Vec<Chat> = self
            .0
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.has_member(&user_id))
            .cloned()
            .collect();
        chats.sort_by_key(|c| (Reverse(c.updated_at), Reverse(c.id)));

        let messages = self.0.messages.lock().unwrap();
        let views = chats
            .into_iter()
            .map(|chat| {
                let last = chat
                    .last_message
                    .and_then(|id| messages.iter().find(|m| m.id == id).cloned());
                let members = chat.users.iter().filter_map(|id| self.0.view_of(*id)).collect();
                ChatView::new(chat, members, last)
            })
            .collect();

        Ok(page(views, pagination))
    }
}

pub struct MemoryMessages(pub Arc<MemoryStore>);

#[async_trait]
impl MessageRepository for MemoryMessages {
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        self.0.messages.lock().unwrap().push(message.clone());
        Ok(message.clone())
    }

    async fn delete_by_chat(&self, chat_id: ObjectId) -> Result<u64, AppError> {
        let mut messages = self.0.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.chat != chat_id);
        Ok((before - messages.len()) as u64)
    }

    async fn list_for_chat(
        &self,
        chat_id: ObjectId,
        pagination: Pagination,
    ) -> Result<Vec<MessageView>, AppError> {
        let mut messages: Vec<Message> = self
            .0
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| (Reverse(m.created_at), Reverse(m.id)));

        let views = messages
            .into_iter()
            .map(|m| {
                let sender = self.0.view_of(m.user);
                MessageView::new(m, sender)
            })
            .collect();

        Ok(page(views, pagination))
    }
}

pub struct MemoryTokens(pub Arc<MemoryStore>);

#[async_trait]
impl TokenRepository for MemoryTokens {
    async fn save(&self, token: &Token) -> Result<ObjectId, AppError> {
        let mut tokens = self.0.tokens.lock().unwrap();
        if tokens
            .iter()
            .any(|t| t.user_id == token.user_id && t.token_type == token.token_type)
        {
            return Err(AppError::Conflict("token already stored".into()));
        }
        tokens.push(token.clone());
        Ok(token.id)
    }

    async fn delete_all_access(&self, user_id: ObjectId) -> Result<u64, AppError> {
        let mut tokens = self.0.tokens.lock().unwrap();
        let before = tokens.len();
        tokens.retain(|t| !(t.user_id == user_id && t.token_type == TokenType::Access));
        Ok((before - tokens.len()) as u64)
    }

    async fn exists(&self, encoded: &str) -> Result<bool, AppError> {
        Ok(self.0.tokens.lock().unwrap().iter().any(|t| t.encoded == encoded))
    }

    async fn count_for_user(&self, user_id: ObjectId, token_type: TokenType) -> Result<u64, AppError> {
        Ok(self
            .0
            .tokens
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id && t.token_type == token_type)
            .count() as u64)
    }
}

/// Readiness probe that can be switched off
#[derive(Default)]
pub struct FakeProbe {
    pub down: AtomicBool,
}

#[async_trait]
impl DatastoreProbe for FakeProbe {
    async fn ping(&self) -> Result<(), AppError> {
        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::Internal("datastore unreachable".into()));
        }
        Ok(())
    }
}

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
            request_timeout_secs: 60,
        },
        database: DatabaseSettings {
            uri: "mongodb://localhost:27017".into(),
            name: "schat_test".into(),
            connect_timeout_secs: 10,
            max_pool_size: 10,
        },
        auth: AuthSettings {
            secret: TEST_SECRET.into(),
            issuer: DEFAULT_TOKEN_ISSUER.into(),
            access_token_lifetime_secs: 3600,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        environment: "test".into(),
    }
}

/// Captured response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).unwrap()
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<MemoryTokens>,
    pub probe: Arc<FakeProbe>,
    pub issuer: Arc<TokenIssuer>,
}

impl TestApp {
    pub fn new() -> Self {
        let settings = test_settings();
        let store = Arc::new(MemoryStore::default());
        let probe = Arc::new(FakeProbe::default());
        let issuer = Arc::new(TokenIssuer::new(&settings.auth));
        let tokens = Arc::new(MemoryTokens(store.clone()));

        let state = AppState {
            users: Arc::new(MemoryUsers(store.clone())),
            chats: Arc::new(MemoryChats(store.clone())),
            messages: Arc::new(MemoryMessages(store.clone())),
            tokens: tokens.clone(),
            issuer: issuer.clone(),
            probe: probe.clone(),
            settings: Arc::new(settings),
        };

        Self {
            router: build_router(state),
            store,
            tokens,
            probe,
            issuer,
        }
    }

    /// Send a request, with an optional JSON body and bearer token
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();

        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, None, Some(token)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value, token: &str) -> TestResponse {
        self.request(Method::PUT, uri, Some(body), Some(token)).await
    }

    pub async fn register(&self, name: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/register",
                Some(serde_json::json!({ "name": name, "password": PASSWORD, "avatarUri": AVATAR })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, name: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/login",
                Some(serde_json::json!({ "name": name, "password": PASSWORD })),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()["token"].as_str().unwrap().to_string()
    }

    /// Register and log in, returning `(user id, token)`
    pub async fn signed_up(&self, name: &str) -> (String, String) {
        let id = self.register(name).await;
        let token = self.login(name).await;
        (id, token)
    }

    /// Create the chat between the token's owner and `username`, returning its id
    pub async fn new_chat(&self, token: &str, username: &str) -> String {
        let response = self
            .put_json(
                "/api/chat/new",
                serde_json::json!({ "name": format!("chat with {}", username), "username": username }),
                token,
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.text());
        response.json()["id"].as_str().unwrap().to_string()
    }

    pub async fn send(&self, token: &str, chat_id: &str, text: &str) -> TestResponse {
        self.put_json(
            &format!("/api/message/{}/new", chat_id),
            serde_json::json!({ "text": text }),
            token,
        )
        .await
    }
}
