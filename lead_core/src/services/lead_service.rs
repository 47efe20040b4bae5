//! The lead submission workflow
//!
//! Transport-agnostic: callable from the HTTP handler, a CLI, or a test
//! harness. Validates the four form steps in order, assembles the sanitized
//! notification email, and dispatches it exactly once through the injected
//! sender. No retries; a provider failure surfaces the manual fallback
//! instruction to the caller.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{BusinessConfig, EmailConfig};
use crate::email::{template, EmailSender};
use crate::metrics::MetricsCollector;
use crate::models::{LeadSubmission, SubmissionResult};
use crate::photos::PhotoValidator;
use crate::validation::{validate_submission, FormStep, StepOutcome, ValidationResult};

/// Detailed outcome of one submission attempt. The HTTP layer maps this to
/// a status code; `SubmissionResult` is the caller-facing contract.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    Accepted,
    Invalid {
        step: FormStep,
        errors: ValidationResult,
    },
    DispatchFailed {
        message: String,
    },
}

impl SubmitOutcome {
    pub fn to_result(&self) -> SubmissionResult {
        match self {
            SubmitOutcome::Accepted => SubmissionResult::ok(),
            SubmitOutcome::Invalid { errors, .. } => SubmissionResult::failed(
                errors
                    .first_message()
                    .unwrap_or("Please check the form and try again"),
            ),
            SubmitOutcome::DispatchFailed { message } => SubmissionResult::failed(message.clone()),
        }
    }
}

#[derive(Clone)]
pub struct LeadService {
    email_config: EmailConfig,
    business: BusinessConfig,
    photo_validator: PhotoValidator,
    sender: Arc<dyn EmailSender>,
    metrics: MetricsCollector,
}

impl LeadService {
    pub fn new(
        email_config: EmailConfig,
        business: BusinessConfig,
        photo_validator: PhotoValidator,
        sender: Arc<dyn EmailSender>,
        metrics: MetricsCollector,
    ) -> Self {
        Self {
            email_config,
            business,
            photo_validator,
            sender,
            metrics,
        }
    }

    fn dispatch_failure_message(&self) -> String {
        format!(
            "Sorry, we couldn't send your request right now. Please call us directly on {}.",
            self.business.fallback_phone
        )
    }

    /// Validate and dispatch one lead. Every call returns an outcome; no
    /// submission is silently dropped.
    pub async fn submit_detailed(&self, lead: LeadSubmission) -> SubmitOutcome {
        self.metrics.record_received();
        let submission_id = Uuid::new_v4();

        match validate_submission(&lead, &self.photo_validator) {
            StepOutcome::Valid => {}
            StepOutcome::Failed { step, result } => {
                self.metrics.record_rejected();
                warn!(
                    %submission_id,
                    step = ?step,
                    fields = ?result.errors.keys().collect::<Vec<_>>(),
                    "Lead rejected by validation"
                );
                return SubmitOutcome::Invalid {
                    step,
                    errors: result,
                };
            }
        }

        let email = template::build_lead_email(&lead, &self.email_config, &self.business);

        match self.sender.send(&email).await {
            Ok(()) => {
                self.metrics.record_accepted();
                self.metrics.record_email_sent();
                info!(
                    %submission_id,
                    service = %lead.service.map(|s| s.label()).unwrap_or("unknown"),
                    postcode = %lead.postcode.trim(),
                    photos = lead.photos.len(),
                    "Lead dispatched"
                );
                SubmitOutcome::Accepted
            }
            Err(err) => {
                self.metrics.record_email_failed();
                error!(%submission_id, error = %err, "Lead dispatch failed");
                SubmitOutcome::DispatchFailed {
                    message: self.dispatch_failure_message(),
                }
            }
        }
    }

    /// The plain `{success, error?}` contract.
    pub async fn submit(&self, lead: LeadSubmission) -> SubmissionResult {
        self.submit_detailed(lead).await.to_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{EmailError, OutboundEmail};
    use crate::models::{PhotoAttachment, Service};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Records sent emails; fails on demand to simulate the provider.
    #[derive(Default)]
    struct MockSender {
        fail: bool,
        sent: Mutex<Vec<OutboundEmail>>,
    }

    #[async_trait]
    impl EmailSender for MockSender {
        async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
            if self.fail {
                return Err(EmailError::Provider("provider down".to_string()));
            }
            self.sent.lock().push(email.clone());
            Ok(())
        }
    }

    fn service_with(sender: Arc<MockSender>) -> LeadService {
        LeadService::new(
            EmailConfig::default(),
            BusinessConfig::default(),
            PhotoValidator::default(),
            sender,
            MetricsCollector::new(),
        )
    }

    fn valid_lead() -> LeadSubmission {
        LeadSubmission {
            service: Some(Service::Bathroom),
            postcode: "SW16 1AB".to_string(),
            name: "Jane Smith".to_string(),
            phone: "07468451511".to_string(),
            email: "jane@example.com".to_string(),
            photos: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_valid_lead_dispatches_once() {
        let sender = Arc::new(MockSender::default());
        let service = service_with(sender.clone());

        let result = service.submit(valid_lead()).await;
        assert_eq!(result, SubmissionResult::ok());

        let sent = sender.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to.as_deref(), Some("jane@example.com"));
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_fallback_phone() {
        let sender = Arc::new(MockSender {
            fail: true,
            ..Default::default()
        });
        let service = service_with(sender);

        let result = service.submit(valid_lead()).await;
        assert!(!result.success);
        let message = result.error.unwrap();
        assert!(message.contains("call us directly"));
        assert!(message.contains(&BusinessConfig::default().fallback_phone));
    }

    #[tokio::test]
    async fn test_invalid_postcode_never_reaches_sender() {
        let sender = Arc::new(MockSender::default());
        let service = service_with(sender.clone());

        let mut lead = valid_lead();
        lead.postcode = "12345".to_string();

        let result = service.submit(lead).await;
        assert!(!result.success);
        assert!(sender.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_photo_rejected_before_dispatch() {
        let sender = Arc::new(MockSender::default());
        let service = service_with(sender.clone());

        let mut lead = valid_lead();
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(6 * 1024 * 1024, 0);
        lead.photos.push(PhotoAttachment {
            filename: "big.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            data,
        });

        let result = service.submit(lead).await;
        assert!(!result.success);
        assert!(sender.sent.lock().is_empty());
    }

    #[tokio::test]
    async fn test_detailed_outcome_names_failing_step() {
        let service = service_with(Arc::new(MockSender::default()));

        let mut lead = valid_lead();
        lead.postcode = "12345".to_string();

        match service.submit_detailed(lead).await {
            SubmitOutcome::Invalid { step, errors } => {
                assert_eq!(step, FormStep::Postcode);
                assert!(errors.errors.contains_key("postcode"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_metrics_track_outcomes() {
        let sender = Arc::new(MockSender::default());
        let metrics = MetricsCollector::new();
        let service = LeadService::new(
            EmailConfig::default(),
            BusinessConfig::default(),
            PhotoValidator::default(),
            sender,
            metrics.clone(),
        );

        service.submit(valid_lead()).await;
        let mut bad = valid_lead();
        bad.email = "nope".to_string();
        service.submit(bad).await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.submissions_received, 2);
        assert_eq!(snapshot.submissions_accepted, 1);
        assert_eq!(snapshot.submissions_rejected, 1);
        assert_eq!(snapshot.emails_sent, 1);
    }
}
