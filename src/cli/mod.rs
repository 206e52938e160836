//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::sync::parse_delimiter;

pub mod commands;
pub mod output;

/// ssm-csv - Export and import AWS SSM parameters as CSV/TSV
#[derive(Parser, Debug)]
#[command(name = "ssm-csv", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except warnings and errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export parameters under a path to a CSV/TSV file
    Export(ExportArgs),

    /// Import parameters from a CSV/TSV file
    Import(ImportArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Options shared by every command that talks to Parameter Store.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// AWS profile [env: AWS_PROFILE] [default: default]
    #[arg(long)]
    pub profile: Option<String>,

    /// AWS region [env: AWS_REGION] [default: ap-southeast-2]
    #[arg(short, long)]
    pub region: Option<String>,

    /// Field delimiter, e.g. ',' ';' or '\t' (default: by file extension)
    #[arg(short, long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file (.tsv/.tab are tab-separated)
    pub file: PathBuf,

    /// Parameter path to export, e.g. /app/production
    #[arg(short, long)]
    pub path: String,

    /// Include parameters nested below the path's direct children
    #[arg(long)]
    pub recursive: bool,

    /// Export SecureString values decrypted
    #[arg(long)]
    pub decrypt: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Source file (.tsv/.tab are tab-separated)
    pub file: PathBuf,

    /// Validate and list planned writes without writing
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}
