//! Outbound email assembly and dispatch

pub mod smtp;
pub mod template;

pub use smtp::SmtpSender;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

/// A binary part attached to the notification email. The transport is
/// responsible for base64-encoding the bytes on the wire.
#[derive(Debug, Clone)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// The shape handed to the email collaborator.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
    pub text: String,
    pub attachments: Vec<EmailAttachment>,
}

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Email provider error: {0}")]
    Provider(String),
}

/// Dispatch boundary. The workflow only depends on this trait, so tests run
/// against a mock and the server binary picks SMTP or log-only at startup.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError>;
}

/// Development fallback when no SMTP transport is configured: logs the
/// dispatch instead of sending it.
#[derive(Debug, Default, Clone)]
pub struct LogSender;

#[async_trait]
impl EmailSender for LogSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        info!(
            to = ?email.to,
            subject = %email.subject,
            attachments = email.attachments.len(),
            "Email dispatch skipped (no SMTP transport configured)"
        );
        Ok(())
    }
}
