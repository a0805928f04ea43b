//! Database Module
//!
//! MongoDB connection, index management and aggregation pipeline builders.

pub mod pipeline;

use std::time::Duration;

use async_trait::async_trait;
use bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::{AuthSettings, DatabaseSettings};
use crate::domain::{Token, User};
use crate::shared::error::AppError;

pub const USERS: &str = "users";
pub const CHATS: &str = "chats";
pub const MESSAGES: &str = "messages";
pub const TOKENS: &str = "tokens";

const DUPLICATE_KEY: i32 = 11000;
const INDEX_OPTIONS_CONFLICT: i32 = 85;
const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

const TOKEN_TTL_INDEX: &str = "tokens_created_at_ttl";

#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("datastore handshake did not finish within {0}s")]
    Timeout(u64),

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
}

/// Connect to MongoDB and verify the deployment answers a ping.
///
/// The whole handshake is bounded by `connect_timeout_secs`; callers treat any
/// error as fatal.
pub async fn connect(settings: &DatabaseSettings) -> Result<Database, ConnectError> {
    let timeout = Duration::from_secs(settings.connect_timeout_secs);

    let handshake = async {
        let mut options = ClientOptions::parse(&settings.uri).await?;
        options.app_name = Some("schat-server".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);
        options.max_pool_size = Some(settings.max_pool_size);

        let client = Client::with_options(options)?;
        let database = client.database(&settings.name);
        database.run_command(doc! { "ping": 1 }).await?;
        Ok::<_, ConnectError>(database)
    };

    tokio::time::timeout(timeout, handshake)
        .await
        .map_err(|_| ConnectError::Timeout(settings.connect_timeout_secs))?
}

/// Create the indexes the repositories rely on.
///
/// - `users`: unique `name`
/// - `tokens`: unique `(userId, type)` and a TTL on `createdAt`
///
/// The TTL index is rebuilt when the configured lifetime changed since the last boot.
pub async fn ensure_indexes(database: &Database, auth: &AuthSettings) -> Result<(), mongodb::error::Error> {
    let users: Collection<User> = database.collection(USERS);
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "name": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("users_name_unique".to_string())
                        .build(),
                )
                .build(),
        )
        .await?;

    let tokens: Collection<Token> = database.collection(TOKENS);
    tokens
        .create_index(
            IndexModel::builder()
                .keys(doc! { "userId": 1, "type": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("tokens_user_type_unique".to_string())
                        .build(),
                )
                .build(),
        )
        .await?;

    let ttl = token_ttl_index(auth.access_token_lifetime_secs);
    if let Err(e) = tokens.create_index(ttl.clone()).await {
        match error_code(&e) {
            Some(INDEX_OPTIONS_CONFLICT) | Some(INDEX_KEY_SPECS_CONFLICT) => {
                tracing::info!(
                    lifetime_secs = auth.access_token_lifetime_secs,
                    "Token lifetime changed, rebuilding TTL index"
                );
                tokens.drop_index(TOKEN_TTL_INDEX).await?;
                tokens.create_index(ttl).await?;
            }
            _ => return Err(e),
        }
    }

    tracing::debug!("Datastore indexes are in place");
    Ok(())
}

fn token_ttl_index(lifetime_secs: i64) -> IndexModel {
    IndexModel::builder()
        .keys(doc! { "createdAt": 1 })
        .options(
            IndexOptions::builder()
                .expire_after(Duration::from_secs(lifetime_secs.max(1) as u64))
                .name(TOKEN_TTL_INDEX.to_string())
                .build(),
        )
        .build()
}

/// Server error code carried by a command or write error.
pub fn error_code(error: &mongodb::error::Error) -> Option<i32> {
    match *error.kind {
        ErrorKind::Command(ref err) => Some(err.code),
        ErrorKind::Write(WriteFailure::WriteError(ref err)) => Some(err.code),
        _ => None,
    }
}

/// Whether the error is a unique index violation.
pub fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    error_code(error) == Some(DUPLICATE_KEY)
}

/// Readiness check against the datastore.
#[async_trait]
pub trait DatastoreProbe: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

pub struct MongoProbe {
    database: Database,
}

impl MongoProbe {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl DatastoreProbe for MongoProbe {
    async fn ping(&self) -> Result<(), AppError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
