use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use sysreport::infrastructure::collectors::SysinfoSource;
use sysreport::presentation::cli::app::Cli;
use sysreport::presentation::cli::commands::report::{
    execute_report, load_config, print_dispatch_summary, print_report_summary, run_dispatch,
    ReportOptions,
};

fn setup_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let options = ReportOptions::from_cli(&cli, &config.report);

    // Manual DI: main.rs is the only place that knows concrete types
    let source = SysinfoSource::new(options.include_all_partitions);
    let run = execute_report(&source, &options, &config)?;
    print_report_summary(&run.report, &options.output);

    if let Some(settings) = run.mail {
        let hostname = sysinfo::System::host_name().unwrap_or_else(|| "localhost".to_string());
        let summary = run_dispatch(&settings, &hostname, &options.output);
        print_dispatch_summary(&summary);
        if summary.is_partial_success() {
            println!("{}", "Report delivered to some recipients only".yellow());
        } else if !summary.is_complete() {
            println!("{}", "Report could not be delivered".red().bold());
        }
    }

    Ok(())
}
