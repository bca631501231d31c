use std::path::Path;

use tracing::{info, warn};

use crate::domain::ports::mailer::{DispatchError, Mailer, OutgoingMail};

pub const MAIL_BODY: &str = "Please see the attached file.";

/// Subject line for a report generated on `hostname`.
#[must_use]
pub fn mail_subject(hostname: &str) -> String {
    format!("{hostname} - Disk Usage Report")
}

/// Sender and recipients of the report mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: String,
    pub recipients: Vec<String>,
}

#[derive(Debug)]
pub struct FailedDelivery {
    pub recipient: String,
    pub error: DispatchError,
}

/// Per-recipient outcome of one dispatch run.
#[derive(Debug, Default)]
pub struct DispatchSummary {
    pub delivered: Vec<String>,
    pub failed: Vec<FailedDelivery>,
}

impl DispatchSummary {
    /// Marks every recipient as failed with the same cause.
    #[must_use]
    pub fn all_failed(recipients: &[String], reason: &str) -> Self {
        Self {
            delivered: Vec::new(),
            failed: recipients
                .iter()
                .map(|r| FailedDelivery {
                    recipient: r.clone(),
                    error: DispatchError::TransportUnavailable(reason.to_string()),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Some recipients got the mail and some did not.
    #[must_use]
    pub fn is_partial_success(&self) -> bool {
        !self.delivered.is_empty() && !self.failed.is_empty()
    }
}

/// Sends the report file to every recipient, one message each.
///
/// A failure for one recipient is logged and recorded; the remaining
/// recipients are still attempted. Nothing is retried.
pub fn dispatch_report(
    mailer: &dyn Mailer,
    envelope: &Envelope,
    hostname: &str,
    attachment: &Path,
) -> DispatchSummary {
    let subject = mail_subject(hostname);
    let mut summary = DispatchSummary::default();

    for recipient in &envelope.recipients {
        let mail = OutgoingMail {
            from: envelope.from.clone(),
            to: recipient.clone(),
            subject: subject.clone(),
            body: MAIL_BODY.to_string(),
            attachment: attachment.to_path_buf(),
        };

        match mailer.send(&mail) {
            Ok(()) => {
                info!("Report sent to {recipient}");
                summary.delivered.push(recipient.clone());
            }
            Err(error) => {
                warn!("Failed to send report to {recipient}: {error}");
                summary.failed.push(FailedDelivery {
                    recipient: recipient.clone(),
                    error,
                });
            }
        }
    }

    summary
}
