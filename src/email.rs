//! Outbound email delivery

mod smtp;

use async_trait::async_trait;
use mailrelay_contact::OutboundMessage;

pub use smtp::SmtpSender;

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("email delivery is not configured, missing {0}")]
    Configuration(String),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("failed to build email message: {0}")]
    Build(String),

    #[error("{0}")]
    Transport(String),
}

/// Capability to deliver a single message.
///
/// Implement this trait to swap the delivery backend, e.g. a recording fake
/// in tests.
#[async_trait]
pub trait MessageSender: Send + Sync + 'static {
    /// Deliver the message, returning its message id.
    async fn send(&self, message: &OutboundMessage) -> Result<String, SendError>;

    /// Probe the backend before sending. Advisory only.
    async fn verify(&self) -> Result<(), SendError> {
        Ok(())
    }
}
