//! Application settings and configuration structures.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Access token lifetime used when the configured value is missing or not positive (4 hours).
pub const DEFAULT_ACCESS_TOKEN_LIFETIME_SECS: i64 = 4 * 60 * 60;

/// Default issuer claim embedded into every access token.
pub const DEFAULT_TOKEN_ISSUER: &str = "schatgo";

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port, request timeout)
    pub server: ServerSettings,

    /// Database configuration (MongoDB)
    pub database: DatabaseSettings,

    /// Token signing and lifetime settings
    pub auth: AuthSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,

    /// Upper bound for handling a single request, in seconds
    pub request_timeout_secs: u64,
}

/// MongoDB configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Connection string, e.g. `mongodb://localhost:27017`
    pub uri: String,

    /// Database name
    pub name: String,

    /// Boot handshake timeout in seconds
    pub connect_timeout_secs: u64,

    /// Maximum number of pooled connections
    pub max_pool_size: u32,
}

/// Token signing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HMAC secret used to sign access tokens
    pub secret: String,

    /// Issuer claim
    pub issuer: String,

    /// Access token lifetime in seconds; also drives the storage TTL of token documents
    pub access_token_lifetime_secs: i64,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins (comma-separated in env)
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the signing secret is missing. The server must not start without it.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // NODE_ENV is honoured for compatibility with existing deployments
        let environment = std::env::var("RUN_ENV")
            .or_else(|_| std::env::var("NODE_ENV"))
            .unwrap_or_else(|_| "development".into());

        Config::builder()
            .set_default("environment", environment.clone())?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .set_default("server.request_timeout_secs", 60)?
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.name", "schat")?
            .set_default("database.connect_timeout_secs", 10)?
            .set_default("database.max_pool_size", 50)?
            .set_default("auth.secret", "")?
            .set_default("auth.issuer", DEFAULT_TOKEN_ISSUER)?
            .set_default("auth.access_token_lifetime_secs", DEFAULT_ACCESS_TOKEN_LIFETIME_SECS)?
            .set_default("cors.allowed_origins", Vec::<String>::new())?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // APP__SERVER__PORT=5000 -> server.port = 5000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("HOST").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("database.uri", std::env::var("MONGO_URI").ok())?
            .set_override_option(
                "database.name",
                std::env::var("MONGO_INITDB_DATABASE").ok(),
            )?
            .set_override_option("auth.secret", std::env::var("JWT_SECRET_KEY").ok())?
            .set_override_option(
                "auth.access_token_lifetime_secs",
                lifetime_override(std::env::var("ACCESS_TOKEN_EXPIRATION_SECONDS").ok()),
            )?
            .build()?
            .try_deserialize()
            .and_then(Self::validated)
    }

    /// Enforce the invariants the rest of the process relies on.
    fn validated(mut settings: Self) -> Result<Self, ConfigError> {
        if settings.auth.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "No signing secret for access tokens (set JWT_SECRET_KEY)".into(),
            ));
        }

        if settings.auth.access_token_lifetime_secs <= 0 {
            tracing::warn!(
                configured = settings.auth.access_token_lifetime_secs,
                fallback = DEFAULT_ACCESS_TOKEN_LIFETIME_SECS,
                "No usable expiration time for access token, falling back to default"
            );
            settings.auth.access_token_lifetime_secs = DEFAULT_ACCESS_TOKEN_LIFETIME_SECS;
        }

        Ok(settings)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Whether the process runs in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Unparsable lifetimes are dropped so the default applies instead of failing the load.
fn lifetime_override(raw: Option<String>) -> Option<String> {
    match raw {
        Some(value) if value.trim().parse::<i64>().is_ok() => Some(value.trim().to_string()),
        Some(value) => {
            tracing::warn!(value = %value, "Ignoring unparsable ACCESS_TOKEN_EXPIRATION_SECONDS");
            None
        }
        None => None,
    }
}
