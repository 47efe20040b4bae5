//! Core library for the lead intake server: validation, email assembly and
//! dispatch, rate limiting, and the HTTP handlers.

pub mod config;
pub mod email;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod photos;
pub mod sanitize;
pub mod services;
pub mod validation;

pub use config::AppConfig;
pub use email::{EmailSender, LogSender, OutboundEmail, SmtpSender};
pub use error::{AppError, Result};
pub use metrics::MetricsCollector;
pub use middleware::rate_limit::{InMemoryRateLimiter, RateLimit};
pub use models::{LeadSubmission, PhotoAttachment, Service, SubmissionResult};
pub use photos::{PhotoPolicy, PhotoValidator};
pub use sanitize::escape_html;
pub use services::LeadService;
pub use validation::{is_valid_phone, is_valid_postcode, validate_submission};

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub config: AppConfig,
    pub lead_service: LeadService,
    pub rate_limiter: Arc<dyn RateLimit>,
    pub metrics: MetricsCollector,
    pub smtp_configured: bool,
}

impl AppState {
    pub fn new(config: AppConfig, sender: Arc<dyn EmailSender>, smtp_configured: bool) -> Self {
        let metrics = MetricsCollector::new();

        let photo_validator = PhotoValidator::new(PhotoPolicy {
            max_bytes: config.uploads.max_photo_bytes,
            ..PhotoPolicy::default()
        });

        let lead_service = LeadService::new(
            config.email.clone(),
            config.business.clone(),
            photo_validator,
            sender,
            metrics.clone(),
        );

        let rate_limiter: Arc<dyn RateLimit> =
            Arc::new(InMemoryRateLimiter::from_config(&config.rate_limit));

        Self {
            app_name: "Lead Intake Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config,
            lead_service,
            rate_limiter,
            metrics,
            smtp_configured,
        }
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimit>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    #[cfg(test)]
    pub(crate) fn for_tests(config: AppConfig) -> Self {
        Self::new(config, Arc::new(LogSender), false)
    }
}

pub fn create_app(state: AppState) -> Router {
    let mut lead_routes = handlers::routes::create_lead_routes();

    if state.config.rate_limit.enable {
        lead_routes = lead_routes.route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    // Room for the photos plus multipart framing overhead.
    let body_limit = state.config.uploads.max_photo_bytes as usize
        * state.config.uploads.max_photos
        + 1024 * 1024;

    let router = Router::new()
        .merge(handlers::routes::create_routes())
        .merge(lead_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_seconds,
        )))
        .layer(middleware::cors::cors_layer_from_config(&state.config.cors));

    middleware::logging::with_request_logging(router).with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
