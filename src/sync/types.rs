//! Outcomes and statistics for sync flows.
//!
//! Declining the confirmation prompt and finding nothing to export are
//! outcomes, not errors: both exit successfully.

use std::path::PathBuf;

use serde::Serialize;

use crate::model::ParameterType;

/// Result of an export invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The user declined; nothing was read or written.
    Cancelled,
    /// The path held no exportable parameters; no file was touched.
    NoParameters {
        /// Parameters seen but not representable (e.g. `StringList`).
        skipped: usize,
    },
    /// Records were written to the destination.
    Exported(ExportStats),
}

/// Statistics for a completed export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Records written to the file.
    pub exported: usize,
    /// Parameters skipped because they could not be represented.
    pub skipped: usize,
    /// List calls made.
    pub pages: usize,
    /// Destination file.
    pub path: PathBuf,
    /// Delimiter used, human-readable.
    pub delimiter: String,
}

/// Result of an import invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The user declined; nothing was read or written.
    Cancelled,
    /// Validated plan; nothing was resolved or written.
    DryRun(ImportPlan),
    /// Every record was written.
    Imported(ImportStats),
}

/// Statistics for a completed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Parameters written.
    pub imported: usize,
    /// How many of those came from secret references.
    pub secrets_resolved: usize,
    /// Source file.
    pub source: PathBuf,
    /// Target profile.
    pub profile: String,
}

/// Writes an import would make, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub source: PathBuf,
    pub profile: String,
    pub writes: Vec<PlannedWrite>,
}

impl ImportPlan {
    /// Number of planned writes that need a secret resolved first.
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.writes.iter().filter(|w| w.secret_reference).count()
    }
}

/// One planned write. Values are never included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedWrite {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ParameterType,
    /// The value is an `op://` reference.
    pub secret_reference: bool,
}
