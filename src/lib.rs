//! ssm-csv - Move AWS SSM Parameter Store parameters to and from CSV/TSV files
//!
//! This crate provides the core functionality for the `ssm-csv` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Record, ParameterType)
//! - [`store`] - Parameter Store access, pagination and throttling
//! - [`sync`] - CSV/TSV export and import flows
//! - [`secrets`] - `op://` secret reference resolution
//! - [`validate`] - Import file schema checks
//! - [`config`] - Profile, region and delimiter resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod secrets;
pub mod store;
pub mod sync;
pub mod validate;

#[cfg(test)]
mod log_capture;

pub use error::{Error, Result};

/// Global quiet flag for `--quiet`.
///
/// When set, informational output is suppressed; errors and warnings
/// still print. Avoids threading a `quiet` bool through every handler.
pub static QUIET: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if quiet mode is active.
#[inline]
pub fn is_quiet() -> bool {
    QUIET.load(std::sync::atomic::Ordering::Relaxed)
}
