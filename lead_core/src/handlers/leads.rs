//! Lead submission handler
//!
//! Accepts multipart form data with fields `service`, `postcode`, `name`,
//! `phone`, `email` and zero-or-more binary parts named `photo-0`,
//! `photo-1`, ... and responds with the `{success, error?}` contract.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    config::UploadConfig,
    error::{AppError, Result},
    models::{LeadSubmission, PhotoAttachment},
    services::lead_service::SubmitOutcome,
    AppState,
};

pub async fn submit_lead(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response> {
    let lead = read_lead_form(multipart, &state.config.uploads).await?;

    match state.lead_service.submit_detailed(lead).await {
        SubmitOutcome::Accepted => {
            Ok((StatusCode::OK, Json(SubmitOutcome::Accepted.to_result())).into_response())
        }
        SubmitOutcome::Invalid { errors, .. } => Err(AppError::Validation(errors)),
        // Dispatch failures stay inside the result body: the user gets the
        // manual fallback instruction, not a transport error.
        outcome @ SubmitOutcome::DispatchFailed { .. } => {
            Ok((StatusCode::OK, Json(outcome.to_result())).into_response())
        }
    }
}

async fn read_lead_form(
    mut multipart: Multipart,
    uploads: &UploadConfig,
) -> Result<LeadSubmission> {
    let mut lead = LeadSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "service" => {
                let value = read_text(field).await?;
                // An unknown value falls through to the step-1 validator.
                lead.service = value.parse().ok();
            }
            "postcode" => lead.postcode = read_text(field).await?,
            "name" => lead.name = read_text(field).await?,
            "phone" => lead.phone = read_text(field).await?,
            "email" => lead.email = read_text(field).await?,
            _ if name.starts_with("photo") => {
                if lead.photos.len() >= uploads.max_photos {
                    return Err(AppError::BadRequest(format!(
                        "Too many photos (max: {})",
                        uploads.max_photos
                    )));
                }

                let filename = field
                    .file_name()
                    .unwrap_or("photo.jpg")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read photo data: {}", e))
                })?;

                lead.photos.push(PhotoAttachment {
                    filename,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(lead)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))
}

#[cfg(test)]
mod tests {
    use crate::{create_app, AppConfig, AppState};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    const BOUNDARY: &str = "test-boundary";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn form_body(fields: &[(&str, &str)]) -> String {
        let mut body = String::new();
        for (name, value) in fields {
            body.push_str(&text_part(name, value));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        body
    }

    fn request(body: String) -> Request<Body> {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/leads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        // ConnectInfo is normally provided by the server; inject it for oneshot.
        req.extensions_mut()
            .insert(axum::extract::ConnectInfo(SocketAddr::from(
                ([127, 0, 0, 1], 9999),
            )));
        req
    }

    fn app() -> axum::Router {
        // Log-only sender: dispatch always succeeds.
        let state = AppState::for_tests(AppConfig::default());
        create_app(state)
    }

    #[tokio::test]
    async fn test_valid_submission_returns_success() {
        let body = form_body(&[
            ("service", "bathroom"),
            ("postcode", "SW16 1AB"),
            ("name", "Jane Smith"),
            ("phone", "07468451511"),
            ("email", "jane@example.com"),
        ]);

        let response = app().oneshot(request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_invalid_postcode_returns_field_errors() {
        let body = form_body(&[
            ("service", "bathroom"),
            ("postcode", "12345"),
            ("name", "Jane Smith"),
            ("phone", "07468451511"),
            ("email", "jane@example.com"),
        ]);

        let response = app().oneshot(request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // The form reads `success` and `error` off every response
        assert_eq!(json["success"], serde_json::json!(false));
        assert_eq!(
            json["error"],
            serde_json::json!("Please enter a valid UK postcode")
        );
        assert!(json["fields"]["postcode"].is_array());
    }

    #[tokio::test]
    async fn test_unknown_service_reports_missing_selection() {
        let body = form_body(&[
            ("service", "swimming-pool"),
            ("postcode", "SW16 1AB"),
            ("name", "Jane Smith"),
            ("phone", "07468451511"),
            ("email", "jane@example.com"),
        ]);

        let response = app().oneshot(request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            json["fields"]["service"][0]["code"],
            serde_json::json!("missing_selection")
        );
    }

    #[tokio::test]
    async fn test_photo_part_is_attached() {
        let mut body = String::new();
        body.push_str(&text_part("service", "extension"));
        body.push_str(&text_part("postcode", "SW16 1AB"));
        body.push_str(&text_part("name", "Jane Smith"));
        body.push_str(&text_part("phone", "07468451511"));
        body.push_str(&text_part("email", "jane@example.com"));
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo-0\"; filename=\"site.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        ));
        // JPEG magic plus padding so the magic-byte check passes
        let mut photo = vec![0xFF, 0xD8, 0xFF, 0xE0];
        photo.resize(64, 0);
        let mut raw = body.into_bytes();
        raw.extend_from_slice(&photo);
        raw.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = Request::builder()
            .method("POST")
            .uri("/api/leads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(raw))
            .unwrap();
        req.extensions_mut()
            .insert(axum::extract::ConnectInfo(SocketAddr::from(
                ([127, 0, 0, 1], 9999),
            )));

        let response = app().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_second_submission_rate_limited() {
        use crate::middleware::rate_limit::InMemoryRateLimiter;
        use std::sync::Arc;
        use std::time::Duration;

        let state = AppState::for_tests(AppConfig::default()).with_rate_limiter(Arc::new(
            InMemoryRateLimiter::new(1, Duration::from_secs(3600)),
        ));
        let app = create_app(state);

        let fields = [
            ("service", "bathroom"),
            ("postcode", "SW16 1AB"),
            ("name", "Jane Smith"),
            ("phone", "07468451511"),
            ("email", "jane@example.com"),
        ];

        let response = app
            .clone()
            .oneshot(request(form_body(&fields)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(request(form_body(&fields))).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("Retry-After"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], serde_json::json!(false));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
