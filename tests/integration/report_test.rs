#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use clap::Parser;
use serde::Deserialize;

use sysreport::application::services::assembler::{assemble, ReportAssembler};
use sysreport::domain::entities::{
    CpuStats, GpuInfo, MemoryStats, NetConnection, NetworkInfo, OsInfo, PartitionInfo,
    UsageStats, UserSession,
};
use sysreport::domain::ports::metric_source::{CollectionError, MetricSource};
use sysreport::domain::value_objects::{MetricSelection, PartitionFilterSpec, SectionId};
use sysreport::application::config::{AppConfig, ConfigError};
use sysreport::presentation::cli::app::Cli;
use sysreport::presentation::cli::commands::report::{execute_report, run_report, ReportOptions};

// ---------------------------------------------------------------------------
// Fixture loader
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct HostFixture {
    hostname: String,
    partitions: Vec<PartitionInfo>,
    usage: HashMap<String, UsageStats>,
    sessions: Vec<UserSession>,
    connections: Vec<NetConnection>,
}

fn load_fixture(name: &str) -> HostFixture {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    let json = std::fs::read_to_string(&path).expect("Failed to read fixture");
    serde_json::from_str(&json).expect("Failed to parse fixture")
}

// ---------------------------------------------------------------------------
// FixtureSource
// ---------------------------------------------------------------------------

struct FixtureSource {
    host: HostFixture,
    calls: Mutex<Vec<String>>,
}

impl FixtureSource {
    fn new(host: HostFixture) -> Self {
        Self {
            host,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().expect("lock").push(call.into());
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }
}

impl MetricSource for FixtureSource {
    fn os_info(&self) -> Result<OsInfo, CollectionError> {
        self.record("os_info");
        Ok(OsInfo {
            system: "Linux".into(),
            release: "6.1.0".into(),
            version: "Debian 12".into(),
            machine: "x86_64".into(),
            processor: "Test CPU".into(),
            uptime_secs: 90_061,
        })
    }

    fn cpu_stats(&self) -> Result<CpuStats, CollectionError> {
        self.record("cpu_stats");
        Ok(CpuStats {
            frequency_mhz: 2400,
            usage_percent: 12.5,
            physical_cores: Some(4),
            logical_cores: 8,
            process_count: 211,
        })
    }

    fn memory_stats(&self) -> Result<MemoryStats, CollectionError> {
        self.record("memory_stats");
        Err(CollectionError::PermissionDenied("/proc/meminfo".into()))
    }

    fn partitions(&self) -> Result<Vec<PartitionInfo>, CollectionError> {
        self.record("partitions");
        Ok(self.host.partitions.clone())
    }

    fn disk_usage(&self, partition: &PartitionInfo) -> Result<UsageStats, CollectionError> {
        self.record(format!("disk_usage {}", partition.mountpoint));
        self.host
            .usage
            .get(&partition.mountpoint)
            .copied()
            .ok_or_else(|| CollectionError::MetricsUnavailable("stale mount".into()))
    }

    fn network_info(&self) -> Result<NetworkInfo, CollectionError> {
        self.record("network_info");
        Ok(NetworkInfo {
            hostname: self.host.hostname.clone(),
            ip_address: Some("10.0.0.2".parse().expect("ip")),
            interfaces: Vec::new(),
        })
    }

    fn gpus(&self) -> Result<Vec<GpuInfo>, CollectionError> {
        self.record("gpus");
        Ok(Vec::new())
    }

    fn user_sessions(&self) -> Result<Vec<UserSession>, CollectionError> {
        self.record("user_sessions");
        Ok(self.host.sessions.clone())
    }

    fn connections(&self) -> Result<Vec<NetConnection>, CollectionError> {
        self.record("connections");
        Ok(self.host.connections.clone())
    }
}

fn all_titles() -> Vec<&'static str> {
    SectionId::ALL.iter().map(SectionId::title).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn disk_only_report_for_root_mountpoint() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let selection = MetricSelection::parse(Some("dsk"));
    let filter = PartitionFilterSpec::new().with_mountpoints(["/"]);

    let text = assemble(&selection, &filter, &source).text();

    assert_eq!(text.matches("DISK STATISTICS").count(), 1);
    assert_eq!(text.matches("Partition:").count(), 1);
    assert!(text.contains("Partition: /dev/sda1"));
    assert!(text.contains("Total: 100.00 GB"));
    assert!(text.contains("Percent Used: 50.00%"));
    for title in all_titles() {
        if title != "DISK STATISTICS" {
            assert!(!text.contains(title), "unexpected section {title}");
        }
    }
    assert_eq!(source.calls(), vec!["partitions", "disk_usage /"]);
}

#[test]
fn mountpoints_match_after_normalization() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let filter = PartitionFilterSpec::new().with_mountpoints(["/home/", "/HOME/./"]);

    let report = assemble(&MetricSelection::parse(Some("dsk")), &filter, &source);
    let disk = report.section(SectionId::Disk).expect("disk section");

    assert_eq!(disk.text.matches("Partition:").count(), 1);
    assert!(disk.text.contains("Mountpoint: /home"));
}

#[test]
fn device_filter_selects_partition() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let filter = PartitionFilterSpec::new().with_devices(["/dev/sda2"]);

    let report = assemble(&MetricSelection::parse(Some("dsk")), &filter, &source);
    let disk = report.section(SectionId::Disk).expect("disk section");

    assert!(disk.text.contains("Partition: /dev/sda2"));
    assert!(!disk.text.contains("/dev/sda1"));
}

#[test]
fn failing_partition_usage_stays_inside_its_block() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let report = assemble(
        &MetricSelection::parse(Some("dsk")),
        &PartitionFilterSpec::new(),
        &source,
    );
    let disk = report.section(SectionId::Disk).expect("disk section");

    assert_eq!(disk.text.matches("Partition:").count(), 3);
    assert!(disk
        .text
        .contains("Not available: failed to collect system metrics: stale mount"));
    assert!(disk.text.contains("Percent Used: 75.00%"));
}

#[test]
fn unmatched_filter_reports_no_partitions() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let filter = PartitionFilterSpec::new().with_mountpoints(["/srv"]);

    let report = assemble(&MetricSelection::parse(Some("dsk")), &filter, &source);
    let disk = report.section(SectionId::Disk).expect("disk section");

    assert!(disk.text.contains("No matching partitions"));
    assert!(!source.calls().iter().any(|c| c.starts_with("disk_usage")));
}

#[test]
fn failing_memory_source_degrades_only_its_section() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let report = assemble(
        &MetricSelection::parse(Some("cpu,mem,net")),
        &PartitionFilterSpec::new(),
        &source,
    );
    let text = report.text();

    assert!(text.contains("MEMORY STATISTICS\n    Not available: permission denied: /proc/meminfo\n"));
    assert!(text.contains("CPU STATISTICS"));
    assert!(text.contains("Hostname: web01"));
}

#[test]
fn user_accounts_only_security_block() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let now = NaiveDate::from_ymd_opt(2024, 1, 15)
        .and_then(|d| d.and_hms_opt(11, 0, 0))
        .expect("valid time");

    let report = ReportAssembler::new(&source).assemble_at(
        &MetricSelection::parse(Some("sec:cua")),
        &PartitionFilterSpec::new(),
        now,
    );
    let text = report.text();

    assert!(text.contains("Connected User Accounts:"));
    assert!(text.contains("Username: alice"));
    assert!(text.contains("Session Duration: 0 days, 01:30"));
    assert!(!text.contains("Active Network Connections:"));
    assert!(!source.calls().contains(&"connections".to_string()));
}

#[test]
fn full_report_keeps_canonical_order() {
    let source = FixtureSource::new(load_fixture("host.json"));
    let text = assemble(
        &MetricSelection::parse(Some("gpu,net,dsk,mem,sec,cpu,os")),
        &PartitionFilterSpec::new(),
        &source,
    )
    .text();

    let positions: Vec<usize> = all_titles()
        .iter()
        .map(|t| text.find(t).unwrap_or_else(|| panic!("missing {t}")))
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(!text.contains("\n\n\n"));
}

#[test]
fn run_report_writes_the_assembled_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output: PathBuf = dir.path().join("out").join("server_info.txt");
    let options = ReportOptions {
        send_email: false,
        mount_points: vec!["/".into()],
        devices: Vec::new(),
        include_all_partitions: false,
        metrics: Some("os,dsk".into()),
        output: output.clone(),
    };

    let source = FixtureSource::new(load_fixture("host.json"));
    let report = run_report(&source, &options).expect("run report");

    let written = std::fs::read_to_string(&output).expect("read report");
    assert_eq!(written, report.text());
    assert!(written.starts_with("OPERATING SYSTEM INFORMATION\n"));
    assert!(written.contains("Uptime: 1 days, 01:01"));
    assert_eq!(report.sections().len(), 2);
}

fn options_with_output(
    args: &[&str],
    output: &std::path::Path,
    config: &AppConfig,
) -> ReportOptions {
    let mut argv = vec!["sysreport", "--output"];
    let output = output.to_str().expect("utf8 path");
    argv.push(output);
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("parse cli");
    ReportOptions::from_cli(&cli, &config.report)
}

#[test]
fn send_email_with_empty_smtp_table_fails_before_collection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("server_info.txt");
    let config: AppConfig = toml::from_str("[smtp]\n").expect("parse config");
    let options = options_with_output(&["--send_email"], &output, &config);

    let source = FixtureSource::new(load_fixture("host.json"));
    let err = execute_report(&source, &options, &config).expect_err("should be rejected");

    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::Missing("smtp_server"))
    );
    assert!(source.calls().is_empty());
    assert!(!output.exists());
}

#[test]
fn conflicting_flags_fail_before_collection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("server_info.txt");
    let config = AppConfig::default();
    let options = options_with_output(
        &["--mount_point", "/", "--include_all_partitions"],
        &output,
        &config,
    );

    let source = FixtureSource::new(load_fixture("host.json"));
    let err = execute_report(&source, &options, &config).expect_err("should be rejected");

    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::ConflictingFlags(_))
    ));
    assert!(source.calls().is_empty());
    assert!(!output.exists());
}

#[test]
fn report_only_run_needs_no_mail_settings() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("server_info.txt");
    let config = AppConfig::default();
    let options = options_with_output(&["--metrics", "cpu"], &output, &config);

    let source = FixtureSource::new(load_fixture("host.json"));
    let run = execute_report(&source, &options, &config).expect("report-only run");

    assert!(run.mail.is_none());
    assert_eq!(source.calls(), vec!["cpu_stats"]);
    let written = std::fs::read_to_string(&output).expect("read report");
    assert!(written.starts_with("CPU STATISTICS\n"));
}

#[test]
fn send_email_with_complete_settings_returns_them() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = dir.path().join("server_info.txt");
    let config: AppConfig = toml::from_str(
        r#"
[smtp]
smtp_server = "smtp.example.com"
smtp_port = 587
smtp_username = "reporter"
smtp_password = "hunter2"

[email]
email_send_to = "ops@example.com"
email_send_from = "reports@example.com"
"#,
    )
    .expect("parse config");
    let options = options_with_output(&["--send_email", "--metrics", "os"], &output, &config);

    let source = FixtureSource::new(load_fixture("host.json"));
    let run = execute_report(&source, &options, &config).expect("run");

    let mail = run.mail.expect("mail settings");
    assert_eq!(mail.envelope.recipients, vec!["ops@example.com"]);
    assert!(output.exists());
}
