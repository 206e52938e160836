//! Configuration management.
//!
//! Every command works against one AWS profile and region and reads or
//! writes one delimited file. These are resolved once into [`SyncOptions`]
//! and passed explicitly into the sync flows.
//!
//! # Resolution order
//!
//! For each option, the first source that provides a value wins:
//! 1. Command-line flag (`--profile`, `--region`, `--delimiter`)
//! 2. Environment (`AWS_PROFILE`; `AWS_REGION`, then `AWS_DEFAULT_REGION`)
//! 3. Config file (`~/.ssm-csv/config.json`, or the path in `SSM_CSV_CONFIG`)
//! 4. Built-in default (`default` profile, `ap-southeast-2` region,
//!    delimiter chosen from the file extension)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sync::parse_delimiter;

/// Region used when nothing else provides one.
pub const DEFAULT_REGION: &str = "ap-southeast-2";

/// Profile used when nothing else provides one.
pub const DEFAULT_PROFILE: &str = "default";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "SSM_CSV_CONFIG";

/// Optional defaults stored in `~/.ssm-csv/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub profile: Option<String>,
    pub region: Option<String>,
    /// Same syntax as `--delimiter`.
    pub delimiter: Option<String>,
}

/// Options shared by every store-facing command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// AWS profile name. Also shown in confirmation prompts.
    pub profile: String,
    /// AWS region.
    pub region: String,
    /// Explicit delimiter; `None` means choose by file extension.
    pub delimiter: Option<u8>,
}

impl SyncOptions {
    /// Resolve options from flags, the process environment and the config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the config file exists but cannot be
    /// read or parsed.
    pub fn resolve(
        profile: Option<&str>,
        region: Option<&str>,
        delimiter: Option<u8>,
    ) -> Result<Self> {
        let file = load_config()?;
        Self::resolve_with(profile, region, delimiter, &file, |key| std::env::var(key).ok())
    }

    /// Resolve options against an explicit config and environment lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the config file's delimiter is invalid.
    pub fn resolve_with(
        profile: Option<&str>,
        region: Option<&str>,
        delimiter: Option<u8>,
        file: &FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let profile = profile
            .map(str::to_string)
            .or_else(|| env("AWS_PROFILE"))
            .or_else(|| file.profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let region = region
            .map(str::to_string)
            .or_else(|| env("AWS_REGION"))
            .or_else(|| env("AWS_DEFAULT_REGION"))
            .or_else(|| file.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let delimiter = match (delimiter, &file.delimiter) {
            (Some(d), _) => Some(d),
            (None, Some(raw)) => Some(
                parse_delimiter(raw)
                    .map_err(|e| Error::Config(format!("Invalid delimiter in config file: {e}")))?,
            ),
            (None, None) => None,
        };

        Ok(Self {
            profile,
            region,
            delimiter,
        })
    }
}

/// Location of the config file, if one can be determined.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    directories::BaseDirs::new().map(|b| b.home_dir().join(".ssm-csv").join("config.json"))
}

/// Load the config file, or defaults if there is none.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but is unreadable or malformed.
pub fn load_config() -> Result<FileConfig> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => Ok(FileConfig::default()),
    }
}

/// Load a config file from an explicit path. A missing file yields defaults.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file exists but is unreadable or malformed.
pub fn load_config_from(path: &Path) -> Result<FileConfig> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    tracing::debug!(path = %path.display(), "Loading config file");

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
}
