use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::application::config::{AppConfig, ConfigError, MailSettings, ReportConfig};
use crate::application::services::assembler::assemble;
use crate::application::services::dispatch::{dispatch_report, DispatchSummary};
use crate::domain::entities::Report;
use crate::domain::ports::metric_source::MetricSource;
use crate::domain::value_objects::partition_filter::PartitionFilterSpec;
use crate::domain::value_objects::selection::MetricSelection;
use crate::infrastructure::mail::SmtpMailer;
use crate::infrastructure::output::{expand_path, write_report};
use crate::presentation::cli::app::{parse_list, Cli};
use crate::presentation::cli::formatters::summary_fmt::{
    format_delivery_failure, format_delivery_success, print_section_header,
};

/// Effective options for one report run, merged from CLI and config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    pub send_email: bool,
    pub mount_points: Vec<String>,
    pub devices: Vec<String>,
    pub include_all_partitions: bool,
    pub metrics: Option<String>,
    pub output: PathBuf,
}

impl ReportOptions {
    /// Command-line values win over the `[report]` table.
    #[must_use]
    pub fn from_cli(cli: &Cli, config: &ReportConfig) -> Self {
        Self {
            send_email: cli.send_email,
            mount_points: cli.mount_point.as_deref().map(parse_list).unwrap_or_default(),
            devices: cli.device.as_deref().map(parse_list).unwrap_or_default(),
            include_all_partitions: cli.include_all_partitions,
            metrics: cli.metrics.clone().or_else(|| config.metrics.clone()),
            output: expand_path(cli.output.as_deref().unwrap_or(&config.output_path)),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ConflictingFlags` when mount points are
    /// requested together with every partition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.include_all_partitions && !self.mount_points.is_empty() {
            return Err(ConfigError::ConflictingFlags(
                "--mount_point cannot be combined with --include_all_partitions".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn partition_filter(&self) -> PartitionFilterSpec {
        PartitionFilterSpec::new()
            .with_devices(self.devices.iter())
            .with_mountpoints(self.mount_points.iter())
    }

    #[must_use]
    pub fn selection(&self) -> MetricSelection {
        MetricSelection::parse(self.metrics.as_deref())
    }
}

/// Picks the configuration for this invocation.
///
/// An explicit `-c` file is read as given and `--send_email` loads (or
/// creates) the default file. A report-only run reads the default file when
/// present and never writes it.
///
/// # Errors
///
/// Returns an error if the selected file cannot be read, parsed or created.
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    match cli.config {
        Some(ref path) => AppConfig::load_from(path),
        None if cli.send_email => AppConfig::load(),
        None => AppConfig::load_existing(),
    }
}

/// Outcome of [`execute_report`]: the written report and, when mailing was
/// requested, the settings it was validated against.
#[derive(Debug)]
pub struct ReportRun {
    pub report: Report,
    pub mail: Option<MailSettings>,
}

/// Rejects bad flags and mail settings, then collects and writes the report.
///
/// Nothing is asked of `source` and no file is touched until every check
/// has passed.
///
/// # Errors
///
/// Returns a `ConfigError` (reachable through `downcast_ref`) for conflicting
/// flags or incomplete mail settings, or an I/O error if the report file
/// cannot be written.
pub fn execute_report(
    source: &dyn MetricSource,
    options: &ReportOptions,
    config: &AppConfig,
) -> anyhow::Result<ReportRun> {
    options.validate()?;
    let mail = if options.send_email {
        Some(config.mail_settings()?)
    } else {
        None
    };

    let report = run_report(source, options)?;
    Ok(ReportRun { report, mail })
}

/// Assembles the selected sections and writes them to the output file.
///
/// # Errors
///
/// Returns an error if the report file cannot be written.
pub fn run_report(source: &dyn MetricSource, options: &ReportOptions) -> anyhow::Result<Report> {
    let selection = options.selection();
    info!(
        "Collecting sections: {}",
        selection
            .iter()
            .map(|id| id.key())
            .collect::<Vec<_>>()
            .join(",")
    );

    let report = assemble(&selection, &options.partition_filter(), source);
    write_report(&options.output, &report.text())
        .with_context(|| format!("could not save report to {}", options.output.display()))?;
    info!("Report written to {}", options.output.display());

    Ok(report)
}

/// Mails the report file to every configured recipient.
///
/// A transport that cannot be set up fails every recipient; it never
/// aborts the run.
#[must_use]
pub fn run_dispatch(settings: &MailSettings, hostname: &str, attachment: &Path) -> DispatchSummary {
    match SmtpMailer::connect(&settings.smtp) {
        Ok(mailer) => dispatch_report(&mailer, &settings.envelope, hostname, attachment),
        Err(e) => {
            warn!("Mail transport unavailable: {e}");
            DispatchSummary::all_failed(&settings.envelope.recipients, &e.to_string())
        }
    }
}

pub fn print_report_summary(report: &Report, output: &Path) {
    print_section_header("Report");
    println!(
        "  {} section(s) written to {}",
        report.sections().len(),
        output.display()
    );
}

pub fn print_dispatch_summary(summary: &DispatchSummary) {
    print_section_header("Email");
    for recipient in &summary.delivered {
        println!("  {}", format_delivery_success(recipient));
    }
    for failed in &summary.failed {
        println!(
            "  {}",
            format_delivery_failure(&failed.recipient, &failed.error.to_string())
        );
    }
}
