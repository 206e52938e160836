//! Import: delimited file → Parameter Store.
//!
//! The whole file is decoded and validated before the first write. Secret
//! references are resolved one at a time right before their write, so a
//! plaintext secret is held in memory only for the duration of one call.
//!
//! Writes are sequential and paced by a [`Throttle`]. A failure stops the
//! batch; earlier writes stay in place and the error reports how many
//! landed.

use std::path::Path;

use crate::config::SyncOptions;
use crate::error::{Error, Result};
use crate::model::Record;
use crate::prompt::Confirm;
use crate::secrets::{SecretResolver, SecretValue, resolve_value};
use crate::store::{ParameterStore, Throttle};
use crate::validate::validate;

use super::delimiter::{describe_delimiter, determine_delimiter};
use super::file::read_rows;
use super::types::{ImportOutcome, ImportPlan, ImportStats, PlannedWrite};

/// Importer for one profile.
pub struct Importer<'a, S, R, C> {
    store: &'a S,
    resolver: &'a R,
    confirm: &'a C,
    options: &'a SyncOptions,
    throttle: Throttle,
    dry_run: bool,
}

impl<'a, S, R, C> Importer<'a, S, R, C>
where
    S: ParameterStore,
    R: SecretResolver,
    C: Confirm,
{
    #[must_use]
    pub fn new(store: &'a S, resolver: &'a R, confirm: &'a C, options: &'a SyncOptions) -> Self {
        Self {
            store,
            resolver,
            confirm,
            options,
            throttle: Throttle::default(),
            dry_run: false,
        }
    }

    /// Replace the default between-write delay.
    #[must_use]
    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    /// Stop after validation and the secrets check; write nothing.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Prompt shown before the file is read.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        format!(
            "Are you sure you want to import SSM parameters to {}?",
            self.options.profile
        )
    }

    /// Run the import.
    ///
    /// `on_written` is called after each successful write with the record
    /// as it appears in the file (references unresolved).
    ///
    /// # Errors
    ///
    /// Returns file, parse or validation errors before any write. Once
    /// writing starts, any failure is wrapped in [`Error::ImportAborted`].
    pub async fn import(
        &self,
        source: &Path,
        mut on_written: impl FnMut(&Record),
    ) -> Result<ImportOutcome> {
        if !self.confirm.confirm(&self.confirmation_message())? {
            tracing::info!(profile = %self.options.profile, "Import cancelled");
            return Ok(ImportOutcome::Cancelled);
        }

        let delimiter = determine_delimiter(source, self.options.delimiter);
        tracing::info!(
            profile = %self.options.profile,
            region = %self.options.region,
            source = %source.display(),
            delimiter = %describe_delimiter(delimiter),
            "Importing parameters"
        );

        let rows = read_rows(source, delimiter)?;
        let records = validate(&rows).map_err(|report| Error::Validation {
            path: source.to_path_buf(),
            report,
        })?;

        let values: Vec<SecretValue> = records
            .iter()
            .map(|r| SecretValue::classify(&r.value))
            .collect();

        if values.iter().any(SecretValue::is_reference) {
            self.resolver.ensure_available().await?;
        }

        if self.dry_run {
            return Ok(ImportOutcome::DryRun(ImportPlan {
                source: source.to_path_buf(),
                profile: self.options.profile.clone(),
                writes: records
                    .iter()
                    .zip(&values)
                    .map(|(record, value)| PlannedWrite {
                        name: record.name.clone(),
                        kind: record.kind,
                        secret_reference: value.is_reference(),
                    })
                    .collect(),
            }));
        }

        let total = records.len();
        let mut secrets_resolved = 0;

        for (written, (record, value)) in records.iter().zip(&values).enumerate() {
            if written > 0 {
                self.throttle.wait().await;
            }

            self.write_one(record, value)
                .await
                .map_err(|cause| Error::ImportAborted {
                    written,
                    total,
                    cause: Box::new(cause),
                })?;

            if value.is_reference() {
                secrets_resolved += 1;
            }
            on_written(record);
        }

        Ok(ImportOutcome::Imported(ImportStats {
            imported: total,
            secrets_resolved,
            source: source.to_path_buf(),
            profile: self.options.profile.clone(),
        }))
    }

    async fn write_one(&self, record: &Record, value: &SecretValue) -> Result<()> {
        let resolved = resolve_value(self.resolver, value).await?;

        tracing::debug!(
            name = %record.name,
            kind = %record.kind,
            secret_reference = value.is_reference(),
            "Writing parameter"
        );

        let to_write = Record {
            value: resolved,
            ..record.clone()
        };
        self.store.put(&to_write).await?;
        Ok(())
    }
}
