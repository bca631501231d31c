#![allow(clippy::expect_used)]

use std::path::Path;
use std::sync::Mutex;

use sysreport::application::config::AppConfig;
use sysreport::application::services::dispatch::{dispatch_report, MAIL_BODY};
use sysreport::domain::ports::mailer::{DispatchError, Mailer, OutgoingMail};
use sysreport::infrastructure::output::write_report;
use sysreport::presentation::cli::commands::report::run_dispatch;

// ---------------------------------------------------------------------------
// FlakyMailer: fails for chosen recipients, records every attempt
// ---------------------------------------------------------------------------

struct FlakyMailer {
    attempts: Mutex<Vec<OutgoingMail>>,
    reject: Vec<&'static str>,
}

impl FlakyMailer {
    fn rejecting(reject: Vec<&'static str>) -> Self {
        Self {
            attempts: Mutex::new(Vec::new()),
            reject,
        }
    }

    fn attempts(&self) -> Vec<OutgoingMail> {
        self.attempts.lock().expect("lock").clone()
    }
}

impl Mailer for FlakyMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), DispatchError> {
        // Reading the attachment mirrors what a real transport does.
        std::fs::read(&mail.attachment).map_err(|e| DispatchError::Attachment(e.to_string()))?;
        self.attempts.lock().expect("lock").push(mail.clone());
        if self.reject.contains(&mail.to.as_str()) {
            return Err(DispatchError::SendFailed(format!("550 rejected {}", mail.to)));
        }
        Ok(())
    }
}

const MAIL_TOML: &str = r#"
[smtp]
smtp_server = "127.0.0.1"
smtp_port = 1
smtp_username = "reporter"
smtp_password = "secret"
smtp_starttls = false

[email]
email_send_to = "a@example.com, b@example.com, c@example.com"
email_send_from = "reports@example.com"
"#;

fn write_sample_report(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("server_info.txt");
    write_report(&path, "DISK STATISTICS\n    No matching partitions\n\n").expect("write report");
    path
}

#[test]
fn middle_recipient_failure_does_not_block_the_others() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = write_sample_report(dir.path());
    let config: AppConfig = toml::from_str(MAIL_TOML).expect("parse config");
    let settings = config.mail_settings().expect("mail settings");

    let mailer = FlakyMailer::rejecting(vec!["b@example.com"]);
    let summary = dispatch_report(&mailer, &settings.envelope, "web01", &report);

    let attempted: Vec<String> = mailer.attempts().into_iter().map(|m| m.to).collect();
    assert_eq!(attempted, vec!["a@example.com", "b@example.com", "c@example.com"]);
    assert_eq!(summary.delivered, vec!["a@example.com", "c@example.com"]);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].recipient, "b@example.com");
    assert!(summary.is_partial_success());
}

#[test]
fn every_message_has_subject_body_and_attachment() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = write_sample_report(dir.path());
    let config: AppConfig = toml::from_str(MAIL_TOML).expect("parse config");
    let settings = config.mail_settings().expect("mail settings");

    let mailer = FlakyMailer::rejecting(Vec::new());
    let summary = dispatch_report(&mailer, &settings.envelope, "web01", &report);

    assert!(summary.is_complete());
    for mail in mailer.attempts() {
        assert_eq!(mail.from, "reports@example.com");
        assert_eq!(mail.subject, "web01 - Disk Usage Report");
        assert_eq!(mail.body, MAIL_BODY);
        assert_eq!(mail.attachment, report);
    }
}

#[test]
fn missing_report_file_fails_each_recipient() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config: AppConfig = toml::from_str(MAIL_TOML).expect("parse config");
    let settings = config.mail_settings().expect("mail settings");

    let mailer = FlakyMailer::rejecting(Vec::new());
    let summary = dispatch_report(
        &mailer,
        &settings.envelope,
        "web01",
        &dir.path().join("missing.txt"),
    );

    assert!(summary.delivered.is_empty());
    assert_eq!(summary.failed.len(), 3);
    assert!(summary
        .failed
        .iter()
        .all(|f| matches!(f.error, DispatchError::Attachment(_))));
}

#[test]
fn unreachable_relay_fails_every_recipient_without_panicking() {
    let dir = tempfile::tempdir().expect("tempdir");
    let report = write_sample_report(dir.path());
    let config: AppConfig = toml::from_str(MAIL_TOML).expect("parse config");
    let settings = config.mail_settings().expect("mail settings");

    let summary = run_dispatch(&settings, "web01", &report);

    assert!(summary.delivered.is_empty());
    assert_eq!(summary.attempted(), 3);
    assert!(!summary.is_complete());
}
