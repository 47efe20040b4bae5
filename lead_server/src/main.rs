//! Main entry point for the lead intake server binary

use anyhow::Result;
use lead_core::{create_app, run_server, AppConfig, AppState, EmailSender, LogSender, SmtpSender};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!(
        "Notification recipients: {}",
        config.email.recipients.join(", ")
    );

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let (sender, smtp_configured): (Arc<dyn EmailSender>, bool) =
        match SmtpSender::from_config(&config.email) {
            Some(smtp) => (Arc::new(smtp), true),
            None => {
                tracing::warn!("No SMTP transport configured - lead emails will only be logged");
                (Arc::new(LogSender), false)
            }
        };

    let state = AppState::new(config, sender, smtp_configured);

    info!("App: {} v{}", state.app_name, state.version);
    info!(
        "Rate limiting: {}",
        if state.config.rate_limit.enable {
            "enabled"
        } else {
            "disabled"
        }
    );

    let app = create_app(state);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) {
            "debug"
        } else {
            "info"
        };

        format!(
            "{}={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer().with_target(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
