use clap::Parser;
use std::path::PathBuf;

/// sysreport: selective host telemetry report
///
/// Collects the selected system metrics into a plain-text report and
/// optionally mails it to the configured recipients.
#[derive(Parser, Debug)]
#[command(name = "sysreport")]
#[command(version, about, long_about)]
pub struct Cli {
    /// Email the report after writing it
    #[arg(long = "send_email")]
    pub send_email: bool,

    /// Only report these mount points (comma separated)
    #[arg(long = "mount_point", value_name = "LIST")]
    pub mount_point: Option<String>,

    /// Only report these devices (comma separated)
    #[arg(long, value_name = "LIST")]
    pub device: Option<String>,

    /// Enumerate every mounted partition, not only physical ones
    #[arg(long = "include_all_partitions")]
    pub include_all_partitions: bool,

    /// Sections to include: os, cpu, sec[:cua|anc], mem, dsk, net, gpu
    #[arg(long, value_name = "LIST")]
    pub metrics: Option<String>,

    /// Report file path (default: from config, then server_info.txt)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Path to custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Splits a comma-separated option value, stripping whitespace and
/// surrounding quotes from each item and dropping empty ones.
#[must_use]
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_defaults() {
        let cli = Cli::try_parse_from(["sysreport"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(!cli.send_email);
        assert!(!cli.include_all_partitions);
        assert!(cli.mount_point.is_none());
        assert!(cli.metrics.is_none());
        assert!(cli.output.is_none());
    }

    #[test]
    fn parse_underscore_flags() {
        let cli = Cli::try_parse_from([
            "sysreport",
            "--send_email",
            "--mount_point",
            "/, /home",
            "--metrics",
            "dsk,mem",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.send_email);
        assert_eq!(cli.mount_point.as_deref(), Some("/, /home"));
        assert_eq!(cli.metrics.as_deref(), Some("dsk,mem"));
    }

    #[test]
    fn parse_include_all_partitions() {
        let cli = Cli::try_parse_from(["sysreport", "--include_all_partitions"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.include_all_partitions);
    }

    #[test]
    fn conflicting_partition_flags_are_accepted_by_the_parser() {
        // Rejected later as a configuration error, before any collection.
        let cli = Cli::try_parse_from([
            "sysreport",
            "--mount_point",
            "/",
            "--include_all_partitions",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.include_all_partitions);
        assert!(cli.mount_point.is_some());
    }

    #[test]
    fn parse_global_config_and_verbose() {
        let cli = Cli::try_parse_from(["sysreport", "-v", "--config", "/tmp/test.toml"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/test.toml")));
    }

    #[test]
    fn parse_output_short_flag() {
        let cli = Cli::try_parse_from(["sysreport", "-o", "~/report.txt"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cli.output.as_deref(), Some("~/report.txt"));
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["sysreport", "--mount-point", "/"]).is_err());
    }

    #[test]
    fn parse_list_strips_whitespace_and_quotes() {
        assert_eq!(
            parse_list(" '/' , \"/home\",/var/log "),
            vec!["/", "/home", "/var/log"]
        );
    }

    #[test]
    fn parse_list_drops_empty_items() {
        assert_eq!(parse_list(",, ,'',/boot"), vec!["/boot"]);
        assert!(parse_list("").is_empty());
    }
}
