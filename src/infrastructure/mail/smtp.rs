use std::path::Path;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::debug;

use crate::application::config::SmtpSettings;
use crate::domain::ports::mailer::{DispatchError, Mailer, OutgoingMail};

const DEFAULT_ATTACHMENT_NAME: &str = "server_info.txt";
const ATTACHMENT_CONTENT_TYPE: &str = "application/octet-stream";

/// Sends report mails through an authenticated SMTP relay.
///
/// STARTTLS is negotiated unless disabled in the settings. The transport
/// keeps its connection open between messages of one run.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Builds the transport. No connection is made until the first send.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::TransportUnavailable` if the TLS parameters for
    /// the relay cannot be set up.
    pub fn connect(settings: &SmtpSettings) -> Result<Self, DispatchError> {
        let builder = if settings.starttls {
            SmtpTransport::starttls_relay(&settings.server).map_err(|e| {
                DispatchError::TransportUnavailable(format!("{}: {e}", settings.server))
            })?
        } else {
            SmtpTransport::builder_dangerous(&settings.server)
        };

        let transport = builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();

        debug!(
            "SMTP transport for {}:{} (starttls: {})",
            settings.server, settings.port, settings.starttls
        );
        Ok(Self { transport })
    }
}

fn mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| DispatchError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

fn attachment_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || DEFAULT_ATTACHMENT_NAME.to_string(),
        |n| n.to_string_lossy().to_string(),
    )
}

/// Composes a multipart message: plain-text body plus the report file.
fn build_message(mail: &OutgoingMail) -> Result<Message, DispatchError> {
    let content = std::fs::read(&mail.attachment).map_err(|e| {
        DispatchError::Attachment(format!("{}: {e}", mail.attachment.display()))
    })?;

    let content_type = ContentType::parse(ATTACHMENT_CONTENT_TYPE)
        .map_err(|e| DispatchError::Message(e.to_string()))?;
    let attachment = Attachment::new(attachment_name(&mail.attachment)).body(content, content_type);

    Message::builder()
        .from(mailbox(&mail.from)?)
        .to(mailbox(&mail.to)?)
        .subject(mail.subject.clone())
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(mail.body.clone()))
                .singlepart(attachment),
        )
        .map_err(|e| DispatchError::Message(e.to_string()))
}

impl Mailer for SmtpMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), DispatchError> {
        let message = build_message(mail)?;
        self.transport
            .send(&message)
            .map_err(|e| DispatchError::SendFailed(format!("{}: {e}", mail.to)))?;
        Ok(())
    }
}
