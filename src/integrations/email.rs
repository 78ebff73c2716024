use askama::Template;
use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    config::MailConfig,
    domain::ContactMessage,
    error::{AppError, Result},
    integrations::{BaseIntegration, Integration, IntegrationEvent},
};

/// Forwards contact form submissions to the association's inbox over SMTP.
pub struct EmailIntegration {
    base: BaseIntegration,
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailIntegration {
    pub fn new(config: Option<MailConfig>) -> Option<Self> {
        let cfg = config?;
        if !cfg.has_credentials() {
            tracing::info!("Mail credentials not configured, contact messages will only be saved");
            return None;
        }

        let transport = match AsyncSmtpTransport::<Tokio1Executor>::relay(&cfg.smtp_host) {
            Ok(builder) => builder
                .credentials(Credentials::new(cfg.username.clone(), cfg.password.clone()))
                .build(),
            Err(e) => {
                tracing::warn!("Invalid SMTP relay {}: {}", cfg.smtp_host, e);
                return None;
            }
        };

        Some(Self {
            base: BaseIntegration::new("Email", true),
            config: cfg,
            transport,
        })
    }

    fn build_message(&self, contact: &ContactMessage) -> Result<Message> {
        let from: Mailbox = self
            .config
            .sender()
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid sender address: {}", e)))?;
        let to: Mailbox = self
            .config
            .recipient
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid recipient address: {}", e)))?;
        let reply_address: Address = contact
            .email
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid reply address: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .reply_to(Mailbox::new(Some(contact.name.clone()), reply_address))
            .subject(format!("İletişim Formu: {}", contact.subject))
            .multipart(MultiPart::alternative_plain_html(
                plain_body(contact),
                html_body(contact)?,
            ))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl Integration for EmailIntegration {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn is_enabled(&self) -> bool {
        self.base.enabled
    }

    async fn health_check(&self) -> Result<()> {
        self.config
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| AppError::Internal(format!("Invalid recipient address: {}", e)))?;
        Ok(())
    }

    async fn handle_event(&self, event: &IntegrationEvent) -> Result<()> {
        match event {
            IntegrationEvent::ContactMessageReceived(contact) => {
                let message = self.build_message(contact)?;
                self.transport
                    .send(message)
                    .await
                    .map_err(|e| AppError::Internal(format!("SMTP delivery failed: {}", e)))?;
                tracing::info!("Forwarded contact message {} by email", contact.id);
                Ok(())
            }
        }
    }
}

fn plain_body(contact: &ContactMessage) -> String {
    format!(
        "Ad Soyad: {}\nE-posta: {}\nKonu: {}\n\nMesaj:\n{}",
        contact.name, contact.email, contact.subject, contact.message
    )
}

#[derive(Template)]
#[template(path = "contact_email.html")]
struct ContactEmailTemplate<'a> {
    name: &'a str,
    email: &'a str,
    subject: &'a str,
    message: &'a str,
}

fn html_body(contact: &ContactMessage) -> Result<String> {
    ContactEmailTemplate {
        name: &contact.name,
        email: &contact.email,
        subject: &contact.subject,
        message: &contact.message,
    }
    .render()
    .map_err(|e| AppError::Internal(format!("Failed to render contact email: {}", e)))
}
