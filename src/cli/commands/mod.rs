//! Command implementations.

pub mod completions;
pub mod export;
pub mod import;

use crate::cli::StoreArgs;
use crate::config::SyncOptions;
use crate::error::{Error, Result};

/// Resolve shared store flags against env and the config file.
fn resolve_options(args: &StoreArgs) -> Result<SyncOptions> {
    SyncOptions::resolve(args.profile.as_deref(), args.region.as_deref(), args.delimiter)
}

/// Runtime for one command.
fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))
}
