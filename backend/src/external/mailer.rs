//! Outbound mail for buyer notifications

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::SmtpConfig;
use crate::error::{AppError, AppResult};

/// Subject line of every buyer notification
pub const NOTIFICATION_SUBJECT: &str = "Entrega retrasada por clima";

/// Delivers a plaintext message to a single address
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, email: &str, text: &str) -> AppResult<()>;
}

/// SMTP sender
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a mailer for the configured relay. No connection is opened
    /// until the first message is sent.
    pub fn new(config: &SmtpConfig) -> AppResult<Self> {
        let from: Mailbox = config
            .sender_address()
            .parse()
            .map_err(|e| AppError::Configuration(format!("invalid smtp sender address: {}", e)))?;

        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(config.host.as_str()).port(config.port);
        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        tracing::info!("Loading smtp config host {} port {}", config.host, config.port);

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Build the plaintext notification message for `email`
    pub fn build_message(&self, email: &str, text: &str) -> AppResult<Message> {
        let to: Mailbox = email
            .parse()
            .map_err(|e| AppError::Mail(format!("invalid recipient {}: {}", email, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(NOTIFICATION_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())
            .map_err(|e| AppError::Mail(e.to_string()))
    }
}

#[async_trait]
impl NotificationSender for SmtpMailer {
    async fn send(&self, email: &str, text: &str) -> AppResult<()> {
        let message = self.build_message(email, text)?;

        self.transport.send(message).await.map_err(|e| {
            tracing::error!("Failed to send email to {}: {}", email, e);
            AppError::Mail(e.to_string())
        })?;

        tracing::info!("Email sent to {}", email);
        Ok(())
    }
}
