//! SMTP transport for outbound notifications

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::info;

use crate::config::EmailConfig;
use crate::email::{EmailError, EmailSender, OutboundEmail};

/// Production `EmailSender` over SMTP with STARTTLS.
#[derive(Clone)]
pub struct SmtpSender {
    mailer: Arc<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpSender {
    /// Build from config. Returns `None` when dispatch is disabled or no
    /// SMTP host is configured; the caller falls back to a log-only sender.
    pub fn from_config(config: &EmailConfig) -> Option<Self> {
        if !config.enabled {
            tracing::debug!("Email dispatch disabled by configuration");
            return None;
        }
        let host = config.smtp_host.as_deref()?;

        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .ok()?
            .port(config.smtp_port);
        let builder = match (&config.smtp_user, &config.smtp_password) {
            (Some(user), Some(password)) => {
                builder.credentials(Credentials::new(user.clone(), password.clone()))
            }
            _ => builder,
        };

        info!(host = %host, port = config.smtp_port, "SMTP transport initialized");
        Some(Self {
            mailer: Arc::new(builder.build()),
        })
    }

    fn build_message(email: &OutboundEmail) -> Result<Message, EmailError> {
        let from: Mailbox = email
            .from
            .parse()
            .map_err(|_| EmailError::InvalidAddress(email.from.clone()))?;

        let mut builder = Message::builder().from(from).subject(email.subject.clone());

        for to in &email.to {
            let mailbox: Mailbox = to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.clone()))?;
            builder = builder.to(mailbox);
        }

        if let Some(reply_to) = &email.reply_to {
            let mailbox: Mailbox = reply_to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(reply_to.clone()))?;
            builder = builder.reply_to(mailbox);
        }

        let mut body = MultiPart::mixed().multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ));

        for attachment in &email.attachments {
            let content_type = ContentType::parse(&attachment.content_type)
                .map_err(|e| EmailError::Build(e.to_string()))?;
            body = body.singlepart(
                Attachment::new(attachment.filename.clone())
                    .body(attachment.data.clone(), content_type),
            );
        }

        builder
            .multipart(body)
            .map_err(|e| EmailError::Build(e.to_string()))
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        if email.to.is_empty() {
            return Err(EmailError::InvalidAddress(
                "no recipients configured".to_string(),
            ));
        }

        let message = Self::build_message(email)?;

        self.mailer
            .send(message)
            .await
            .map_err(|e| EmailError::Provider(e.to_string()))?;

        info!(recipients = email.to.len(), "Lead notification email sent");
        Ok(())
    }
}
