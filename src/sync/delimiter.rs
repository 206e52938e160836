//! Delimiter parsing and selection.
//!
//! The same rule picks the delimiter for reading and writing: an explicit
//! choice wins, otherwise tab-separated extensions get a tab and everything
//! else a comma.

use std::path::Path;

/// Extensions read and written as tab-separated (case-insensitive).
pub const TAB_EXTENSIONS: [&str; 2] = ["tsv", "tab"];

/// Default delimiter.
pub const COMMA: u8 = b',';

/// Tab delimiter.
pub const TAB: u8 = b'\t';

/// Parse a user-supplied delimiter.
///
/// Accepts any single ASCII character other than a quote or line break,
/// plus `\t` and `tab` as spellings for a tab.
///
/// # Errors
///
/// Returns a message suitable for clap's value parser.
pub fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "\\t" | "tab" | "TAB" => return Ok(TAB),
        _ => {}
    }

    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => {
            let byte = c as u8;
            if matches!(byte, b'"' | b'\n' | b'\r') {
                Err(format!("'{}' cannot be used as a delimiter", c.escape_default()))
            } else {
                Ok(byte)
            }
        }
        (Some(_), None) => Err(format!("delimiter must be an ASCII character, got '{raw}'")),
        _ => Err(format!(
            "delimiter must be a single character (or \\t for tab), got '{raw}'"
        )),
    }
}

/// Pick the delimiter for `path`.
#[must_use]
pub fn determine_delimiter(path: &Path, explicit: Option<u8>) -> u8 {
    if let Some(delimiter) = explicit {
        return delimiter;
    }

    let is_tab = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TAB_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)));

    if is_tab { TAB } else { COMMA }
}

/// Human-readable delimiter for logs and summaries.
#[must_use]
pub fn describe_delimiter(delimiter: u8) -> String {
    match delimiter {
        TAB => "tab".to_string(),
        b' ' => "space".to_string(),
        other => char::from(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_extension_without_override() {
        assert_eq!(determine_delimiter(Path::new("out/params.tsv"), None), TAB);
        assert_eq!(determine_delimiter(Path::new("params.TSV"), None), TAB);
        assert_eq!(determine_delimiter(Path::new("params.tab"), None), TAB);
    }

    #[test]
    fn test_other_extensions_default_to_comma() {
        assert_eq!(determine_delimiter(Path::new("params.csv"), None), COMMA);
        assert_eq!(determine_delimiter(Path::new("params.txt"), None), COMMA);
        assert_eq!(determine_delimiter(Path::new("params"), None), COMMA);
        assert_eq!(determine_delimiter(Path::new("tsv"), None), COMMA);
    }

    #[test]
    fn test_override_always_wins() {
        assert_eq!(determine_delimiter(Path::new("params.tsv"), Some(b',')), b',');
        assert_eq!(determine_delimiter(Path::new("params.csv"), Some(b';')), b';');
        assert_eq!(determine_delimiter(Path::new("params.csv"), Some(TAB)), TAB);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("|"), Ok(b'|'));
        assert_eq!(parse_delimiter("\t"), Ok(TAB));
        assert_eq!(parse_delimiter("\\t"), Ok(TAB));
        assert_eq!(parse_delimiter("tab"), Ok(TAB));

        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("\"").is_err());
        assert!(parse_delimiter("\n").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_describe_delimiter() {
        assert_eq!(describe_delimiter(TAB), "tab");
        assert_eq!(describe_delimiter(b','), ",");
    }
}
