//! Delimited file codec and file operations.
//!
//! Decoding turns file bytes into untyped rows keyed by header name; the
//! validator decides whether they are records. Encoding writes the fixed
//! `Name,Type,Value` header and quotes a field only when it contains the
//! delimiter, a quote or a line break.
//!
//! Exports are written atomically: temp file, fsync, rename. An interrupted
//! export leaves the previous file (if any) untouched.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::Path;

use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};

use crate::error::{Error, Result};
use crate::model::{HEADER, RawRow, Record};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `EPERM` on Unix.
const EPERM: i32 = 1;

/// Decode delimited text into rows.
///
/// The first line is the header. Rows shorter than the header omit the
/// missing columns; cells beyond the header, and cells under a repeated
/// header name, are kept under `column N` keys so the validator can flag
/// them instead of silently dropping data. Each row records the file line
/// it starts on.
/// Blank lines are skipped. Empty or header-only input yields no rows.
///
/// # Errors
///
/// Returns the underlying CSV error for invalid UTF-8 or I/O failures.
pub fn decode(bytes: &[u8], delimiter: u8) -> std::result::Result<Vec<RawRow>, csv::Error> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let keys = column_keys(reader.headers()?);
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;
        let row: RawRow = record
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let key = keys
                    .get(i)
                    .cloned()
                    .unwrap_or_else(|| positional_key(i));
                (key, cell.to_string())
            })
            .collect();
        rows.push(match record.position() {
            Some(position) => row.at_line(start_line(bytes, position)),
            None => row,
        });
    }

    Ok(rows)
}

/// Row keys for each header cell. A repeated name keeps only its first
/// occurrence; later ones become `column N` so no cell is overwritten.
fn column_keys(headers: &csv::StringRecord) -> Vec<String> {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            if seen.insert(name) {
                name.to_string()
            } else {
                positional_key(i)
            }
        })
        .collect()
}

fn positional_key(index: usize) -> String {
    format!("column {}", index + 1)
}

/// Line a record actually starts on.
///
/// The reader stamps a record with its position before skipping blank
/// lines, so step over any line breaks at that offset.
fn start_line(bytes: &[u8], position: &csv::Position) -> u64 {
    let from = usize::try_from(position.byte()).map_or(bytes.len(), |b| b.min(bytes.len()));
    let blank = bytes[from..]
        .iter()
        .take_while(|b| matches!(b, b'\r' | b'\n'))
        .filter(|b| **b == b'\n')
        .count();
    position.line() + blank as u64
}

/// Encode records with the `Name,Type,Value` header.
///
/// # Errors
///
/// Returns an error only if the in-memory writer fails.
pub fn encode(records: &[Record], delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record([record.name.as_str(), record.kind.as_str(), record.value.as_str()])?;
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

/// Check that `path` can be opened for reading.
///
/// # Errors
///
/// Returns a distinct error for not found, permission denied and
/// operation not permitted.
pub fn check_file_access(path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "Checking file access");

    match File::open(path) {
        Ok(_) => Ok(()),
        Err(e) => Err(read_error(path, &e)),
    }
}

/// Read and decode a parameter file.
///
/// # Errors
///
/// Returns a file access error or [`Error::Parse`].
pub fn read_rows(path: &Path, delimiter: u8) -> Result<Vec<RawRow>> {
    check_file_access(path)?;

    tracing::debug!(
        path = %path.display(),
        delimiter = %super::describe_delimiter(delimiter),
        "Parsing file"
    );

    let bytes = fs::read(path).map_err(|e| read_error(path, &e))?;

    decode(&bytes, delimiter).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        line: e.position().map(csv::Position::line),
        message: parse_message(&e),
    })
}

/// Encode records and write them to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`Error::WritePermissionDenied`], [`Error::NoSpace`] or
/// [`Error::Write`] with the destination path.
pub fn write_records(path: &Path, records: &[Record], delimiter: u8) -> Result<()> {
    let content = encode(records, delimiter)?;

    tracing::debug!(
        path = %path.display(),
        delimiter = %super::describe_delimiter(delimiter),
        bytes = content.len(),
        "Exporting to file"
    );

    atomic_write(path, &content).map_err(|e| write_error(path, &e))
}

/// Write content to a file atomically.
///
/// This function:
/// 1. Creates the parent directory if needed
/// 2. Writes content to a temporary file next to the target
/// 3. Calls `fsync` to ensure data is on disk
/// 4. Atomically renames the temp file to the target path
///
/// If any step fails, the original file (if any) remains untouched.
///
/// # Errors
///
/// Returns an error if any file operation fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tracing::debug!(dir = %parent.display(), "Creating directory");
        fs::create_dir_all(parent)?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let written = (|| {
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path)
}

fn read_error(path: &Path, e: &io::Error) -> Error {
    let path = path.to_path_buf();

    if cfg!(unix) && e.raw_os_error() == Some(EPERM) {
        return Error::FileNotPermitted { path };
    }

    match e.kind() {
        ErrorKind::NotFound => Error::FileNotFound { path },
        ErrorKind::PermissionDenied => Error::FilePermissionDenied { path },
        _ => Error::FileAccess {
            path,
            reason: e.to_string(),
        },
    }
}

fn write_error(path: &Path, e: &io::Error) -> Error {
    let path = path.to_path_buf();
    match e.kind() {
        ErrorKind::PermissionDenied => Error::WritePermissionDenied { path },
        ErrorKind::StorageFull => Error::NoSpace { path },
        _ => Error::Write {
            path,
            reason: e.to_string(),
        },
    }
}

fn parse_message(e: &csv::Error) -> String {
    match e.kind() {
        csv::ErrorKind::Utf8 { .. } => "file is not valid UTF-8".to_string(),
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterType;
    use crate::sync::{COMMA, TAB};
    use tempfile::TempDir;

    fn sample() -> Vec<Record> {
        vec![
            Record::new("/app/db", ParameterType::String, "mydb"),
            Record::new("/app/key", ParameterType::SecureString, "op://v/i/f"),
            Record::new("/app/list", ParameterType::String, "a,b,c"),
            Record::new("/app/quote", ParameterType::String, r#"say "hi""#),
            Record::new("/app/multi", ParameterType::String, "line1\nline2"),
            Record::new("/app/tabbed", ParameterType::String, "x\ty"),
            Record::new("/app/empty", ParameterType::String, ""),
        ]
    }

    fn decoded_records(rows: &[RawRow]) -> Vec<Record> {
        crate::validate::validate(rows).unwrap()
    }

    #[test]
    fn test_encode_header_and_minimal_quoting() {
        let out = String::from_utf8(encode(&sample()[..4], COMMA).unwrap()).unwrap();
        assert_eq!(
            out,
            "Name,Type,Value\n\
             /app/db,String,mydb\n\
             /app/key,SecureString,op://v/i/f\n\
             /app/list,String,\"a,b,c\"\n\
             /app/quote,String,\"say \"\"hi\"\"\"\n"
        );
    }

    #[test]
    fn test_encode_tab_quotes_only_tabs() {
        let records = vec![
            Record::new("/a", ParameterType::String, "a,b"),
            Record::new("/b", ParameterType::String, "x\ty"),
        ];
        let out = String::from_utf8(encode(&records, TAB).unwrap()).unwrap();
        assert_eq!(out, "Name\tType\tValue\n/a\tString\ta,b\n/b\tString\t\"x\ty\"\n");
    }

    #[test]
    fn test_encode_empty_is_header_only() {
        let out = encode(&[], COMMA).unwrap();
        assert_eq!(out, b"Name,Type,Value\n");
    }

    #[test]
    fn test_round_trip_comma_and_tab() {
        for delimiter in [COMMA, TAB, b';'] {
            let bytes = encode(&sample(), delimiter).unwrap();
            let rows = decode(&bytes, delimiter).unwrap();
            assert_eq!(decoded_records(&rows), sample(), "delimiter {delimiter}");
        }
    }

    #[test]
    fn test_decode_empty_inputs() {
        assert!(decode(b"", COMMA).unwrap().is_empty());
        assert!(decode(b"Name,Type,Value\n", COMMA).unwrap().is_empty());
        assert!(decode(b"Name,Type,Value", COMMA).unwrap().is_empty());
    }

    #[test]
    fn test_decode_preserves_order_and_keys() {
        let rows = decode(b"Name,Type,Value\n/b,String,2\n/a,String,1\n", COMMA).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Name"], "/b");
        assert_eq!(rows[1]["Name"], "/a");
        assert_eq!(rows[1]["Value"], "1");
    }

    #[test]
    fn test_decode_short_and_long_rows() {
        let rows = decode(b"Name,Type,Value\n/a,String\n/b,String,x,extra\n", COMMA).unwrap();
        assert!(!rows[0].contains_key("Value"));
        assert_eq!(rows[1]["column 4"], "extra");
    }

    #[test]
    fn test_decode_repeated_header_keeps_every_cell() {
        let rows = decode(b"Name,Type,Value,Value\n/a,String,keep,shadow\n", COMMA).unwrap();
        assert_eq!(rows[0]["Value"], "keep");
        assert_eq!(rows[0]["column 4"], "shadow");

        let report = crate::validate::validate(&rows).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations[0].field, "column 4");
    }

    #[test]
    fn test_decode_records_file_lines() {
        let rows = decode(b"Name,Type,Value\n\n\n/a,Bogus,1\n/b,String,\"x\ny\"\n/c,String,2\n", COMMA)
            .unwrap();
        let lines: Vec<Option<u64>> = rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![Some(4), Some(5), Some(7)]);

        let rendered = crate::validate::validate(&rows).unwrap_err().to_string();
        assert!(rendered.contains("row 1 (line 4): Type"), "{rendered}");
    }

    #[test]
    fn test_decode_strips_bom_and_trims_headers() {
        let rows = decode(b"\xEF\xBB\xBFName, Type, Value\n/a,String,1\n", COMMA).unwrap();
        assert_eq!(rows[0]["Name"], "/a");
        assert_eq!(rows[0]["Type"], "String");
    }

    #[test]
    fn test_decode_crlf() {
        let rows = decode(b"Name,Type,Value\r\n/a,String,1\r\n", COMMA).unwrap();
        assert_eq!(rows[0]["Value"], "1");
    }

    #[test]
    fn test_read_rows_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_rows(&temp_dir.path().join("nope.csv"), COMMA).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_read_rows_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(&path, b"Name,Type,Value\n/a,String,\xFF\xFE\n").unwrap();

        let err = read_rows(&path, COMMA).unwrap_err();
        match err {
            Error::Parse { line, message, .. } => {
                assert_eq!(line, Some(2));
                assert!(message.contains("UTF-8"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_write_records_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("deeper").join("out.tsv");

        write_records(&path, &sample()[..1], TAB).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Name\tType\tValue\n/app/db\tString\tmydb\n");
        assert!(!temp_dir.path().join("nested/deeper/out.tsv.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.csv");
        fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_write_error_mapping() {
        let path = Path::new("/tmp/x.csv");
        let denied = io::Error::from(ErrorKind::PermissionDenied);
        assert!(matches!(write_error(path, &denied), Error::WritePermissionDenied { .. }));
        let full = io::Error::from(ErrorKind::StorageFull);
        assert!(matches!(write_error(path, &full), Error::NoSpace { .. }));
        let other = io::Error::other("boom");
        assert!(matches!(write_error(path, &other), Error::Write { .. }));
    }
}
