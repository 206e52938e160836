//! Parameter record model.
//!
//! A [`Record`] is the unit of transfer between Parameter Store and a
//! delimited file. Column names in files match the store's own field
//! names (`Name`, `Type`, `Value`) so exported files read naturally.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An untyped row from a delimited file: header name to cell text.
///
/// Produced by the file codec and checked by [`crate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    /// 1-based file line the row starts on, when read from a file.
    pub line: Option<u64>,
    pub cells: BTreeMap<String, String>,
}

impl RawRow {
    /// Attach the file line the row starts on.
    #[must_use]
    pub fn at_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&String> {
        self.cells.get(column)
    }

    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    /// Column names present in this row, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.cells.keys()
    }
}

impl FromIterator<(String, String)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            line: None,
            cells: iter.into_iter().collect(),
        }
    }
}

impl std::ops::Index<&str> for RawRow {
    type Output = String;

    fn index(&self, column: &str) -> &String {
        &self.cells[column]
    }
}

/// Header row written to and expected from parameter files.
pub const HEADER: [&str; 3] = ["Name", "Type", "Value"];

/// Parameter type as understood by this tool.
///
/// Parameter Store also knows `StringList`, which has no counterpart
/// here; those parameters are skipped on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    /// Plain text value.
    String,
    /// Value encrypted at rest with the account's KMS key.
    SecureString,
}

impl ParameterType {
    /// All accepted values, in the order they appear in help text.
    pub const ALL: [Self; 2] = [Self::String, Self::SecureString];

    /// Canonical spelling used in files and by the store.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::SecureString => "SecureString",
        }
    }

    /// Whether the store treats values of this type as sensitive.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        matches!(self, Self::SecureString)
    }
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParameterType {
    type Err = String;

    /// Exact, case-sensitive match. `string` is not `String`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(Self::String),
            "SecureString" => Ok(Self::SecureString),
            _ => Err(format!("Unknown parameter type: {s}")),
        }
    }
}

/// One parameter: the row shape of every export and import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Full parameter path, unique within a store (e.g. `/app/db/host`).
    #[serde(rename = "Name")]
    pub name: String,

    /// Parameter type.
    #[serde(rename = "Type")]
    pub kind: ParameterType,

    /// Raw value. On import this may be an `op://` secret reference.
    #[serde(rename = "Value")]
    pub value: String,
}

impl Record {
    /// Create a record.
    pub fn new(name: impl Into<String>, kind: ParameterType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_type_from_str_is_exact() {
        assert_eq!("String".parse::<ParameterType>(), Ok(ParameterType::String));
        assert_eq!(
            "SecureString".parse::<ParameterType>(),
            Ok(ParameterType::SecureString)
        );
        assert!("string".parse::<ParameterType>().is_err());
        assert!("StringList".parse::<ParameterType>().is_err());
        assert!("".parse::<ParameterType>().is_err());
    }

    #[test]
    fn test_parameter_type_display_matches_as_str() {
        for kind in ParameterType::ALL {
            assert_eq!(kind.to_string(), kind.as_str());
        }
        assert!(ParameterType::SecureString.is_secure());
        assert!(!ParameterType::String.is_secure());
    }

    #[test]
    fn test_record_serializes_with_store_field_names() {
        let record = Record::new("/app/db", ParameterType::String, "mydb");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Name"], "/app/db");
        assert_eq!(json["Type"], "String");
        assert_eq!(json["Value"], "mydb");
    }
}
