//! Health check handler

use axum::{extract::State, response::IntoResponse, Json};

use crate::{models::ApiResponse, AppState};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "version": state.version,
        "email_transport": if state.smtp_configured { "smtp" } else { "log" },
    })))
}
