use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },
    #[error("failed to read attachment: {0}")]
    Attachment(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("failed to send message: {0}")]
    SendFailed(String),
    #[error("mail transport unavailable: {0}")]
    TransportUnavailable(String),
}

/// One message addressed to exactly one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: PathBuf,
}

pub trait Mailer {
    /// Send a single message.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError` if the message cannot be composed or the
    /// transport rejects it.
    fn send(&self, mail: &OutgoingMail) -> Result<(), DispatchError>;
}
