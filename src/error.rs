//! Error types for ssm-csv.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Exit codes (1 for runtime failures, 2 for bad arguments)
//! - Context-aware recovery hints
//! - Structured JSON output for `--json` consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::secrets::SecretError;
use crate::store::StoreError;
use crate::validate::ValidationReport;

/// Result type alias for ssm-csv operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // File access
    FileNotFound,
    PermissionDenied,
    NotPermitted,
    FileAccessError,

    // Input
    ParseError,
    ValidationFailed,

    // Secrets
    SecretsUnavailable,
    SecretResolutionFailed,

    // Parameter Store
    StoreError,

    // Output
    WriteError,

    // Environment
    ConfigError,
    PromptError,
    IoError,
    JsonError,

    // Arguments (exit 2)
    InvalidArgument,

    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::NotPermitted => "NOT_PERMITTED",
            Self::FileAccessError => "FILE_ACCESS_ERROR",
            Self::ParseError => "PARSE_ERROR",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::SecretsUnavailable => "SECRETS_UNAVAILABLE",
            Self::SecretResolutionFailed => "SECRET_RESOLUTION_FAILED",
            Self::StoreError => "STORE_ERROR",
            Self::WriteError => "WRITE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::PromptError => "PROMPT_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Process exit code: 2 for bad arguments, 1 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArgument => 2,
            _ => 1,
        }
    }

    /// Whether re-running the same command may succeed without changes.
    ///
    /// Store calls are upserts, so repeating a failed import is safe.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreError | Self::SecretResolutionFailed)
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in ssm-csv operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Permission denied. Cannot read file: {}", path.display())]
    FilePermissionDenied { path: PathBuf },

    #[error("Operation not permitted on file: {}", path.display())]
    FileNotPermitted { path: PathBuf },

    #[error("Unexpected error accessing file {}: {reason}", path.display())]
    FileAccess { path: PathBuf, reason: String },

    #[error("Failed to parse {}{}: {message}", path.display(), line.map(|l| format!(" at line {l}")).unwrap_or_default())]
    Parse {
        path: PathBuf,
        line: Option<u64>,
        message: String,
    },

    #[error("Invalid parameter file {} ({} problem(s)):\n{report}", path.display(), report.len())]
    Validation {
        path: PathBuf,
        report: ValidationReport,
    },

    #[error(transparent)]
    Secret(#[from] SecretError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Import aborted after {written} of {total} parameters: {cause}")]
    ImportAborted {
        written: usize,
        total: usize,
        #[source]
        cause: Box<Error>,
    },

    #[error("Permission denied. Cannot write to {}", path.display())]
    WritePermissionDenied { path: PathBuf },

    #[error("No space left on device. Cannot write to {}", path.display())]
    NoSpace { path: PathBuf },

    #[error("Failed to export to file {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(#[from] inquire::InquireError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::FileNotFound { .. } => ErrorCode::FileNotFound,
            Self::FilePermissionDenied { .. } => ErrorCode::PermissionDenied,
            Self::FileNotPermitted { .. } => ErrorCode::NotPermitted,
            Self::FileAccess { .. } => ErrorCode::FileAccessError,
            Self::Parse { .. } | Self::Csv(_) => ErrorCode::ParseError,
            Self::Validation { .. } => ErrorCode::ValidationFailed,
            Self::Secret(SecretError::Unavailable { .. }) => ErrorCode::SecretsUnavailable,
            Self::Secret(_) => ErrorCode::SecretResolutionFailed,
            Self::Store(_) => ErrorCode::StoreError,
            Self::ImportAborted { cause, .. } => cause.error_code(),
            Self::WritePermissionDenied { .. } | Self::NoSpace { .. } | Self::Write { .. } => {
                ErrorCode::WriteError
            }
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Prompt(_) => ErrorCode::PromptError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::FileNotFound { .. } => Some(
                "Check the path. Relative paths are resolved from the current directory."
                    .to_string(),
            ),

            Self::Parse { .. } | Self::Validation { .. } => Some(format!(
                "Files need a header row with the columns Name, Type and Value.\n  \
                 Type must be 'String' or 'SecureString' (case-sensitive).\n  \
                 Files ending in .{} are read as tab-separated, everything else as comma-separated.\n  \
                 Use --delimiter to override, e.g. --delimiter ';' or --delimiter '\\t'.",
                crate::sync::TAB_EXTENSIONS.join(" or .")
            )),

            Self::Secret(SecretError::Unavailable { .. }) => Some(
                "Values starting with op:// are read with the 1Password CLI.\n  \
                 Install it and sign in: op signin"
                    .to_string(),
            ),

            Self::ImportAborted { written, cause, .. } => {
                let mut hint = format!(
                    "{written} parameter(s) were written before the failure and were not rolled back.\n  \
                     Writes overwrite existing values, so re-running the import is safe."
                );
                if let Some(inner) = cause.hint() {
                    hint.push_str("\n  ");
                    hint.push_str(&inner);
                }
                Some(hint)
            }

            Self::Store(_) => Some(
                "Check the profile's credentials and region, and that it is allowed\n  \
                 ssm:GetParametersByPath and ssm:PutParameter on the target path."
                    .to_string(),
            ),

            Self::Prompt(_) => Some(
                "Confirmation needs an interactive terminal. Run the command from a TTY."
                    .to_string(),
            ),

            Self::Config(_) => Some(
                "Fix or remove the config file (~/.ssm-csv/config.json, or the path in SSM_CSV_CONFIG)."
                    .to_string(),
            ),

            Self::InvalidArgument(msg) if msg.contains("path") => Some(
                "Parameter Store paths are absolute, e.g. --path /app/production".to_string(),
            ),

            Self::FilePermissionDenied { .. }
            | Self::FileNotPermitted { .. }
            | Self::FileAccess { .. }
            | Self::Secret(_)
            | Self::WritePermissionDenied { .. }
            | Self::NoSpace { .. }
            | Self::Write { .. }
            | Self::InvalidArgument(_)
            | Self::Csv(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Self::ImportAborted { written, total, .. } = self {
            obj["error"]["written"] = serde_json::json!(written);
            obj["error"]["total"] = serde_json::json!(total);
        }

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}
