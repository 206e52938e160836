//! Parameter Store ⇄ file sync.
//!
//! - **Export**: every parameter under a path → one CSV/TSV file
//! - **Import**: one CSV/TSV file → Parameter Store, resolving `op://`
//!   references on the way
//!
//! Both flows ask for confirmation first and pace store calls with a
//! [`Throttle`](crate::store::Throttle).
//!
//! # File Format
//!
//! ```text
//! Name,Type,Value
//! /app/db/host,String,db.internal
//! /app/db/password,SecureString,op://infra/db/password
//! ```
//!
//! Tab-separated when the file ends in `.tsv` or `.tab`, or whatever
//! `--delimiter` says.
//!
//! # Example
//!
//! ```ignore
//! use ssm_csv::sync::{ExportRequest, Exporter, Importer};
//!
//! let outcome = Exporter::new(&store, &prompt, &options)
//!     .export(&ExportRequest { destination, query })
//!     .await?;
//!
//! let outcome = Importer::new(&store, &resolver, &prompt, &options)
//!     .import(&source, |record| println!("Importing {}", record.name))
//!     .await?;
//! ```

mod delimiter;
mod export;
mod file;
mod import;
mod types;

pub use delimiter::{
    COMMA, TAB, TAB_EXTENSIONS, describe_delimiter, determine_delimiter, parse_delimiter,
};
pub use export::{ExportRequest, Exporter, check_store_path};
pub use file::{atomic_write, check_file_access, decode, encode, read_rows, write_records};
pub use import::Importer;
pub use types::{
    ExportOutcome, ExportStats, ImportOutcome, ImportPlan, ImportStats, PlannedWrite,
};
