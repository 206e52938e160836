//! ssm-csv CLI entry point.

use clap::Parser;
use ssm_csv::cli::commands;
use ssm_csv::cli::{Cli, Commands};
use ssm_csv::error::Result;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.quiet {
        ssm_csv::QUIET.store(true, std::sync::atomic::Ordering::Relaxed);
    }
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Run the command and handle errors
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_structured_json());
            } else if let Some(hint) = e.hint() {
                eprintln!("Error: {e}\n  Hint: {hint}");
            } else {
                eprintln!("Error: {e}");
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(filter_directive(verbose, quiet))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Log filter for the verbosity flags. `--quiet` wins over `-v`.
fn filter_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug,aws_config=info,aws_smithy_runtime=info,hyper=info",
        _ => "trace",
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Export(args) => commands::export::execute(args, cli.json),
        Commands::Import(args) => commands::import::execute(args, cli.json),
        Commands::Completions { shell } => commands::completions::execute(shell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(0, false), "warn");
        assert_eq!(filter_directive(1, false), "info");
        assert!(filter_directive(2, false).starts_with("debug,"));
        assert_eq!(filter_directive(5, false), "trace");
    }

    #[test]
    fn test_quiet_keeps_only_errors() {
        assert_eq!(filter_directive(0, true), "error");
        assert_eq!(filter_directive(3, true), "error");
    }
}
