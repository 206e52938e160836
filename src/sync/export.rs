//! Export: Parameter Store → delimited file.
//!
//! The flow is confirm, read every page under the path, then write the
//! file in one atomic step. Nothing touches the destination until every
//! page has been read, so a failed read never leaves a partial file.

use std::path::PathBuf;

use crate::config::SyncOptions;
use crate::error::Result;
use crate::prompt::Confirm;
use crate::store::{ParameterStore, Query, Throttle, fetch_all};

use super::delimiter::{describe_delimiter, determine_delimiter};
use super::file::write_records;
use super::types::{ExportOutcome, ExportStats};

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub destination: PathBuf,
    pub query: Query,
}

/// Exporter for one profile.
pub struct Exporter<'a, S, C> {
    store: &'a S,
    confirm: &'a C,
    options: &'a SyncOptions,
    throttle: Throttle,
}

impl<'a, S: ParameterStore, C: Confirm> Exporter<'a, S, C> {
    #[must_use]
    pub fn new(store: &'a S, confirm: &'a C, options: &'a SyncOptions) -> Self {
        Self {
            store,
            confirm,
            options,
            throttle: Throttle::default(),
        }
    }

    /// Replace the default between-call delay.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Prompt shown before anything is read.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Are you sure you want to export SSM parameters from {}?",
            self.options.profile
        )
    }

    /// Run the export.
    ///
    /// # Errors
    ///
    /// Returns a store error if any list call fails, or a write error if
    /// the destination cannot be written. Neither leaves a partial file.
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportOutcome> {
        if !self.confirm.confirm(&self.confirmation_message())? {
            tracing::info!(profile = %self.options.profile, "Export cancelled");
            return Ok(ExportOutcome::Cancelled);
        }

        tracing::info!(
            profile = %self.options.profile,
            region = %self.options.region,
            path = %request.query.path,
            recursive = request.query.recursive,
            "Exporting parameters"
        );

        let fetched = fetch_all(self.store, &request.query, &self.throttle).await?;

        if fetched.skipped > 0 {
            tracing::info!(
                skipped = fetched.skipped,
                "Some parameters could not be exported and were skipped"
            );
        }

        if fetched.records.is_empty() {
            return Ok(ExportOutcome::NoParameters {
                skipped: fetched.skipped,
            });
        }

        let delimiter = determine_delimiter(&request.destination, self.options.delimiter);
        write_records(&request.destination, &fetched.records, delimiter)?;

        Ok(ExportOutcome::Exported(ExportStats {
            exported: fetched.records.len(),
            skipped: fetched.skipped,
            pages: fetched.pages,
            path: request.destination.clone(),
            delimiter: describe_delimiter(delimiter),
        }))
    }
}

/// Reject store paths the service would refuse.
///
/// # Errors
///
/// Returns a message when `path` does not start with `/`.
pub fn check_store_path(path: &str) -> std::result::Result<(), String> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(format!("store path must start with '/', got '{path}'"))
    }
}
