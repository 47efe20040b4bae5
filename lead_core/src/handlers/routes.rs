//! Route table for the lead intake server

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::{handlers, models::ApiResponse, AppState};

/// Routes that do not take the submission rate limit layer.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handlers::health::handle_health))
        .route("/api/stats", get(handle_stats))
}

/// The submission route, layered separately so the rate limiter only
/// applies here.
pub fn create_lead_routes() -> Router<AppState> {
    Router::new().route("/api/leads", post(handlers::leads::submit_lead))
}

async fn handle_root(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "app": state.app_name,
        "version": state.version,
        "endpoints": {
            "health": "/health",
            "stats": "/api/stats",
            "leads": "POST /api/leads"
        }
    })))
}

async fn handle_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.metrics.snapshot()))
}
