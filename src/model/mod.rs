//! Data models for ssm-csv.
//!
//! - [`Record`]: one parameter (`Name`, `Type`, `Value`)
//! - [`ParameterType`]: `String` or `SecureString`

pub mod parameter;

pub use parameter::{HEADER, ParameterType, RawRow, Record};
