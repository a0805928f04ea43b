//! Application Startup
//!
//! Application building and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

use crate::application::services::{Populator, RelationshipCoordinator, TokenIssuer};
use crate::config::Settings;
use crate::domain::{ChatRepository, MessageRepository, TokenRepository, UserRepository};
use crate::infrastructure::database::{self, DatastoreProbe, MongoProbe};
use crate::infrastructure::repositories::{
    MongoChatRepository, MongoMessageRepository, MongoTokenRepository, MongoUserRepository,
};
use crate::presentation::http::routes;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub chats: Arc<dyn ChatRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub issuer: Arc<TokenIssuer>,
    pub probe: Arc<dyn DatastoreProbe>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Write side of the user/chat/message relationships.
    pub fn coordinator(&self) -> RelationshipCoordinator {
        RelationshipCoordinator::new(self.users.clone(), self.chats.clone(), self.messages.clone())
    }

    pub fn populator(&self) -> Populator {
        Populator::new(self.users.clone(), self.chats.clone(), self.messages.clone())
    }
}

/// Router with every route and middleware for the given state.
pub fn build_router(state: AppState) -> Router {
    routes::create_router(state)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    ///
    /// Fails when the datastore does not answer within the boot timeout or the
    /// indexes cannot be created. The process must not serve in that case.
    pub async fn build(settings: Settings) -> Result<Self> {
        let db = database::connect(&settings.database)
            .await
            .context("Failed to connect to MongoDB")?;
        tracing::info!(database = %settings.database.name, "Datastore connection established");

        database::ensure_indexes(&db, &settings.auth)
            .await
            .context("Failed to create datastore indexes")?;

        let state = AppState {
            users: Arc::new(MongoUserRepository::new(&db)),
            chats: Arc::new(MongoChatRepository::new(&db)),
            messages: Arc::new(MongoMessageRepository::new(&db)),
            tokens: Arc::new(MongoTokenRepository::new(&db)),
            issuer: Arc::new(TokenIssuer::new(&settings.auth)),
            probe: Arc::new(MongoProbe::new(db)),
            settings: Arc::new(settings.clone()),
        };

        let router = build_router(state);

        let addr = settings.server_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;
        tracing::info!("Listening on {}", addr);

        Ok(Self { listener, router })
    }

    /// Run the server until stopped
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }

    /// Get the bound address
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
