//! # sChat Server
//!
//! Entry point: loads configuration, initializes logging, connects to the
//! datastore and serves the HTTP API until a shutdown signal arrives.

use anyhow::Result;
use tracing::info;

use schat_server::config::Settings;
use schat_server::startup::Application;

fn run_env_is_production() -> bool {
    std::env::var("RUN_ENV")
        .or_else(|_| std::env::var("NODE_ENV"))
        .map(|env| env.eq_ignore_ascii_case("production"))
        .unwrap_or(false)
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is read before the mode is known so RUN_ENV may come from it
    let _ = dotenvy::dotenv();

    schat_server::telemetry::init_tracing(run_env_is_production());

    info!("Starting sChat server...");

    let settings = Settings::load()?;
    info!(
        host = %settings.server.host,
        port = %settings.server.port,
        environment = %settings.environment,
        "Configuration loaded"
    );

    let application = Application::build(settings).await?;

    info!("Server ready to accept connections");
    application.run_until_stopped().await?;

    Ok(())
}
