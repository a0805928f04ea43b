//! Telemetry and Observability
//!
//! Structured logging setup. Production emits one JSON object per line,
//! everything else the human readable format.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,schat_server=debug,mongodb=warn,tower_http=debug";
const PRODUCTION_FILTER: &str = "info,mongodb=warn,tower_http=info";

/// Initialize tracing subscriber
///
/// `RUST_LOG` overrides the default filter in every environment.
pub fn init_tracing(production: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if production { PRODUCTION_FILTER } else { DEFAULT_FILTER })
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if production {
        registry
            .with(fmt::layer().json().with_current_span(true).with_target(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }

    tracing::info!(production, "Tracing initialized");
}
