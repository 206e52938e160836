//! Record schema validation for imported files.
//!
//! Turns untyped rows from the file codec into typed [`Record`]s. The whole
//! batch is checked in one pass and every problem is collected, so a user
//! fixing a file sees all of them at once rather than one per run.
//!
//! Near-miss values (`Securestring`, a `name` column) get a suggestion via
//! edit distance, the same way a typo'd flag would.

use std::fmt;

use crate::model::{HEADER, ParameterType, RawRow, Record};

/// Why one field of one row was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationReason {
    /// A required column has no cell in this row.
    Missing,
    /// A required cell is present but empty.
    Empty,
    /// `Type` is not one of the accepted literals.
    InvalidType {
        found: String,
        suggestion: Option<String>,
    },
    /// The file has a column the record shape does not know.
    UnknownField { suggestion: Option<String> },
    /// The file has a header but no data rows (or nothing at all).
    EmptyBatch,
}

impl fmt::Display for ViolationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required field is missing"),
            Self::Empty => f.write_str("required field is empty"),
            Self::InvalidType { found, suggestion } => {
                write!(f, "invalid type '{found}', expected one of {}", allowed_types())?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{s}'?)")?;
                }
                Ok(())
            }
            Self::UnknownField { suggestion } => {
                f.write_str("unexpected column")?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean '{s}'?)")?;
                }
                Ok(())
            }
            Self::EmptyBatch => f.write_str("file contains no parameter rows"),
        }
    }
}

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// 1-based data row number, `None` for batch-level problems.
    pub row: Option<usize>,
    /// File line the row starts on, when known.
    pub line: Option<u64>,
    /// Column the problem is about (empty for batch-level problems).
    pub field: String,
    pub reason: ViolationReason,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.line) {
            (Some(row), Some(line)) => {
                write!(f, "row {row} (line {line}): {}: {}", self.field, self.reason)
            }
            (Some(row), None) => write!(f, "row {row}: {}: {}", self.field, self.reason),
            (None, _) => write!(f, "{}", self.reason),
        }
    }
}

/// Every violation found in a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True when nothing was rejected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Distinct data rows with at least one violation, ascending.
    #[must_use]
    pub fn invalid_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.violations.iter().filter_map(|v| v.row).collect();
        rows.dedup();
        rows
    }

    fn push(&mut self, at: Option<(usize, &RawRow)>, field: &str, reason: ViolationReason) {
        self.violations.push(Violation {
            row: at.map(|(n, _)| n),
            line: at.and_then(|(_, row)| row.line),
            field: field.to_string(),
            reason,
        });
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Validate a batch of parsed rows.
///
/// Succeeds only if there is at least one row and every row has exactly
/// the `Name`, `Type` and `Value` columns, a non-empty `Name`, and a `Type`
/// of `String` or `SecureString`. `Value` may be empty.
///
/// # Errors
///
/// Returns a [`ValidationReport`] listing every violation across all rows.
pub fn validate(rows: &[RawRow]) -> Result<Vec<Record>, ValidationReport> {
    let mut report = ValidationReport::default();

    if rows.is_empty() {
        report.push(None, "", ViolationReason::EmptyBatch);
        return Err(report);
    }

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if let Some(record) = validate_row(index + 1, row, &mut report) {
            records.push(record);
        }
    }

    if report.is_empty() {
        Ok(records)
    } else {
        Err(report)
    }
}

fn validate_row(row_num: usize, row: &RawRow, report: &mut ValidationReport) -> Option<Record> {
    let before = report.len();

    let at = Some((row_num, row));

    for key in row.keys() {
        if !HEADER.contains(&key.as_str()) {
            let suggestion = closest(key, &HEADER);
            report.push(at, key, ViolationReason::UnknownField { suggestion });
        }
    }

    let name = match row.get("Name") {
        None => {
            report.push(at, "Name", ViolationReason::Missing);
            None
        }
        Some(name) if name.is_empty() => {
            report.push(at, "Name", ViolationReason::Empty);
            None
        }
        Some(name) => Some(name.clone()),
    };

    let kind = match row.get("Type") {
        None => {
            report.push(at, "Type", ViolationReason::Missing);
            None
        }
        Some(found) => match found.parse::<ParameterType>() {
            Ok(kind) => Some(kind),
            Err(_) => {
                let names = ParameterType::ALL.map(|k| k.as_str());
                report.push(
                    at,
                    "Type",
                    ViolationReason::InvalidType {
                        found: found.clone(),
                        suggestion: closest(found, &names),
                    },
                );
                None
            }
        },
    };

    let value = if let Some(value) = row.get("Value") {
        Some(value.clone())
    } else {
        report.push(at, "Value", ViolationReason::Missing);
        None
    };

    if report.len() > before {
        return None;
    }

    Some(Record {
        name: name?,
        kind: kind?,
        value: value?,
    })
}

fn allowed_types() -> String {
    ParameterType::ALL
        .iter()
        .map(|k| format!("'{k}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Closest candidate by case-insensitive edit distance (≤ 3).
fn closest(input: &str, candidates: &[&str]) -> Option<String> {
    let lower = input.to_lowercase();
    candidates
        .iter()
        .map(|c| (levenshtein_distance(&lower, &c.to_lowercase()), *c))
        .filter(|(dist, _)| *dist <= 3)
        .min_by_key(|(dist, _)| *dist)
        .map(|(_, c)| c.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row optimization
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_valid_batch() {
        let rows = vec![
            row(&[("Name", "/app/db"), ("Type", "String"), ("Value", "mydb")]),
            row(&[("Name", "/app/key"), ("Type", "SecureString"), ("Value", "")]),
        ];

        let records = validate(&rows).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], Record::new("/app/db", ParameterType::String, "mydb"));
        assert_eq!(records[1].kind, ParameterType::SecureString);
        assert_eq!(records[1].value, "");
    }

    #[test]
    fn test_empty_batch_rejected() {
        let report = validate(&[]).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].reason, ViolationReason::EmptyBatch);
        assert_eq!(report.violations[0].row, None);
    }

    #[test]
    fn test_reports_all_invalid_rows() {
        let rows = vec![
            row(&[("Name", "/ok/1"), ("Type", "String"), ("Value", "a")]),
            row(&[("Name", ""), ("Type", "String"), ("Value", "b")]),
            row(&[("Name", "/ok/2"), ("Type", "String"), ("Value", "c")]),
            row(&[("Name", "/bad/type"), ("Type", "Foo"), ("Value", "d")]),
        ];

        let report = validate(&rows).unwrap_err();
        assert_eq!(report.invalid_rows(), vec![2, 4]);
        assert_eq!(report.violations[0].field, "Name");
        assert_eq!(report.violations[0].reason, ViolationReason::Empty);
        assert!(matches!(
            &report.violations[1].reason,
            ViolationReason::InvalidType { found, .. } if found == "Foo"
        ));
    }

    #[test]
    fn test_multiple_violations_in_one_row() {
        let rows = vec![row(&[("Type", "Bogus")])];

        let report = validate(&rows).unwrap_err();
        let fields: Vec<&str> = report.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["Name", "Type", "Value"]);
    }

    #[test]
    fn test_unknown_column_with_suggestion() {
        let rows = vec![row(&[
            ("name", "/app/db"),
            ("Type", "String"),
            ("Value", "x"),
        ])];

        let report = validate(&rows).unwrap_err();
        assert!(report.violations.iter().any(|v| v.field == "name"
            && v.reason
                == ViolationReason::UnknownField {
                    suggestion: Some("Name".to_string())
                }));
        assert!(
            report
                .violations
                .iter()
                .any(|v| v.field == "Name" && v.reason == ViolationReason::Missing)
        );
    }

    #[test]
    fn test_type_is_case_sensitive_but_suggested() {
        let rows = vec![row(&[
            ("Name", "/app/key"),
            ("Type", "securestring"),
            ("Value", "x"),
        ])];

        let report = validate(&rows).unwrap_err();
        assert_eq!(
            report.violations[0].reason,
            ViolationReason::InvalidType {
                found: "securestring".to_string(),
                suggestion: Some("SecureString".to_string()),
            }
        );
    }

    #[test]
    fn test_report_display_uses_file_lines() {
        let rows = vec![
            row(&[("Name", "/a"), ("Type", "String"), ("Value", "1")]).at_line(2),
            // Blank lines before this row push it down the file.
            row(&[("Name", "/b"), ("Type", "Nope"), ("Value", "2")]).at_line(5),
        ];

        let report = validate(&rows).unwrap_err();
        assert_eq!(report.violations[0].line, Some(5));

        let rendered = report.to_string();
        assert!(rendered.contains("row 2 (line 5): Type"), "{rendered}");
        assert!(rendered.contains("'String', 'SecureString'"));
    }

    #[test]
    fn test_report_display_without_file_lines() {
        let rows = vec![row(&[("Name", ""), ("Type", "String"), ("Value", "1")])];

        let rendered = validate(&rows).unwrap_err().to_string();
        assert!(rendered.contains("row 1: Name"), "{rendered}");
        assert!(!rendered.contains("line"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
