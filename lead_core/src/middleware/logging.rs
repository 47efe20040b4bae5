//! Request logging middleware configuration

use axum::Router;
use http::Request;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info_span;

use crate::AppState;

pub fn with_request_logging(router: Router<AppState>) -> Router<AppState> {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            })
            .on_response(
                |response: &http::Response<_>, latency: Duration, _span: &tracing::Span| {
                    let status = response.status();
                    let latency_ms = latency.as_millis();

                    if status.is_success() {
                        tracing::info!(
                            status = status.as_u16(),
                            latency_ms = latency_ms,
                            "request completed"
                        );
                    } else if status.is_client_error() {
                        tracing::warn!(
                            status = status.as_u16(),
                            latency_ms = latency_ms,
                            "client error response"
                        );
                    } else {
                        tracing::error!(
                            status = status.as_u16(),
                            latency_ms = latency_ms,
                            "server error response"
                        );
                    }
                },
            )
            .on_failure(
                |error: tower_http::classify::ServerErrorsFailureClass,
                 latency: Duration,
                 _span: &tracing::Span| {
                    tracing::error!(
                        latency_ms = latency.as_millis(),
                        error = ?error,
                        "request failed"
                    );
                },
            ),
    )
}
