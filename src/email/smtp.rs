//! SMTP delivery using lettre

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};
use mailrelay_contact::OutboundMessage;
use tracing::info;
use uuid::Uuid;

use super::{MessageSender, SendError};
use crate::config::EmailConfig;

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransportMode {
    /// Unencrypted and unauthenticated, only without a password and `smtp_secure`
    Plain,
    /// TLS from connection start
    ImplicitTls,
    /// Upgraded with STARTTLS
    StartTls,
}

/// Relays messages through the configured SMTP account.
///
/// A transport is built for every send so no connection outlives a request.
#[derive(Debug, Clone)]
pub struct SmtpSender {
    config: EmailConfig,
}

impl SmtpSender {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn ensure_configured(&self) -> Result<(), SendError> {
        let missing = self.config.missing_settings();
        if missing.is_empty() {
            return Ok(());
        }

        Err(SendError::Configuration(missing.join(", ")))
    }

    fn mode(&self) -> TransportMode {
        if self.config.smtp_secure {
            TransportMode::ImplicitTls
        } else if self.config.smtp_password.is_empty() {
            TransportMode::Plain
        } else {
            TransportMode::StartTls
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, SendError> {
        let config = &self.config;
        let host = config.smtp_host.trim();

        let builder = match self.mode() {
            TransportMode::Plain => {
                // Local catchers such as MailDev accept plain unauthenticated sessions
                info!(
                    smtp_host = %host,
                    smtp_port = config.smtp_port,
                    "SMTP password not configured, using unauthenticated connection"
                );
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            }
            TransportMode::ImplicitTls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| SendError::Transport(e.to_string()))?,
            TransportMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| SendError::Transport(e.to_string()))?,
        }
        .port(config.smtp_port);

        if config.smtp_password.is_empty() {
            return Ok(builder.build());
        }

        let creds = Credentials::new(
            config.smtp_username.trim().to_owned(),
            config.smtp_password.clone(),
        );

        Ok(builder.credentials(creds).build())
    }

    /// Build the email with a locally generated message id.
    fn build_message(&self, message: &OutboundMessage) -> Result<(String, Message), SendError> {
        let config = &self.config;

        let from_address: Address = config
            .smtp_username
            .trim()
            .parse()
            .map_err(|_| SendError::InvalidAddress(config.smtp_username.clone()))?;

        let from_name = config.from_name.trim();
        let from = Mailbox::new(
            (!from_name.is_empty()).then(|| from_name.to_owned()),
            from_address,
        );

        let to: Mailbox = config
            .contact_address
            .trim()
            .parse()
            .map_err(|_| SendError::InvalidAddress(config.contact_address.clone()))?;

        let reply_to: Mailbox = message
            .reply_to
            .parse()
            .map_err(|_| SendError::InvalidAddress(message.reply_to.clone()))?;

        let message_id = format!("<{}@{}>", Uuid::new_v4(), from.email.domain());

        let email = Message::builder()
            .message_id(Some(message_id.clone()))
            .from(from)
            .reply_to(reply_to)
            .to(to)
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text.clone(),
                message.html.clone(),
            ))
            .map_err(|e| SendError::Build(e.to_string()))?;

        Ok((message_id, email))
    }
}

#[async_trait]
impl MessageSender for SmtpSender {
    async fn send(&self, message: &OutboundMessage) -> Result<String, SendError> {
        self.ensure_configured()?;

        let (message_id, email) = self.build_message(message)?;
        let transport = self.transport()?;

        transport
            .send(email)
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;

        info!(message_id = %message_id, "Email relayed");

        Ok(message_id)
    }

    async fn verify(&self) -> Result<(), SendError> {
        self.ensure_configured()?;

        match self.transport()?.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(SendError::Transport(
                "SMTP server rejected the connection test".to_string(),
            )),
            Err(e) => Err(SendError::Transport(e.to_string())),
        }
    }
}
