//! Secret reference resolution.
//!
//! Import files may carry `op://vault/item/field` references instead of
//! literal values. Each value is classified once into a [`SecretValue`] when
//! the import plan is built, and references are resolved right before the
//! parameter is written.
//!
//! The default resolver shells out to the 1Password CLI (`op read`).

use std::future::Future;

use tokio::process::Command;

/// Prefix that marks a value as a secret reference.
pub const REFERENCE_PREFIX: &str = "op://";

/// A parameter value as read from an import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretValue {
    /// Written to the store as-is.
    Literal(String),
    /// Dereferenced through a [`SecretResolver`] before writing.
    Reference(String),
}

impl SecretValue {
    /// Classify a raw cell value.
    #[must_use]
    pub fn classify(value: &str) -> Self {
        if value.starts_with(REFERENCE_PREFIX) {
            Self::Reference(value.to_string())
        } else {
            Self::Literal(value.to_string())
        }
    }

    /// True for `op://` references.
    #[must_use]
    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Reference(_))
    }
}

/// Secret resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// The secrets manager cannot be used at all.
    #[error("Secrets manager unavailable ({program}): {message}")]
    Unavailable { program: String, message: String },

    /// One reference could not be read.
    #[error("Failed to resolve secret reference {reference}: {message}")]
    Resolve { reference: String, message: String },
}

/// Resolves secret references to plaintext.
pub trait SecretResolver: Send + Sync {
    /// Check once, before any write, that references can be resolved.
    fn ensure_available(&self) -> impl Future<Output = Result<(), SecretError>> + Send;

    /// Resolve one reference to its plaintext value.
    fn resolve(&self, reference: &str) -> impl Future<Output = Result<String, SecretError>> + Send;
}

/// Produce the value to write: literals pass through, references resolve.
///
/// # Errors
///
/// Propagates the resolver's error for references.
pub async fn resolve_value<R: SecretResolver>(
    resolver: &R,
    value: &SecretValue,
) -> Result<String, SecretError> {
    match value {
        SecretValue::Literal(literal) => Ok(literal.clone()),
        SecretValue::Reference(reference) => resolver.resolve(reference).await,
    }
}

/// Resolver backed by the 1Password CLI.
#[derive(Debug, Clone)]
pub struct OnePasswordCli {
    program: String,
}

impl OnePasswordCli {
    /// Use `op` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("op")
    }

    /// Use a specific executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for OnePasswordCli {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretResolver for OnePasswordCli {
    async fn ensure_available(&self) -> Result<(), SecretError> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|e| SecretError::Unavailable {
                program: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SecretError::Unavailable {
                program: self.program.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        tracing::debug!(
            program = %self.program,
            version = %String::from_utf8_lossy(&output.stdout).trim(),
            "Secrets manager available"
        );
        Ok(())
    }

    async fn resolve(&self, reference: &str) -> Result<String, SecretError> {
        tracing::debug!(reference, "Resolving secret reference");

        let output = Command::new(&self.program)
            .args(["read", "--no-newline", reference])
            .output()
            .await
            .map_err(|e| SecretError::Resolve {
                reference: reference.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(SecretError::Resolve {
                reference: reference.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| SecretError::Resolve {
            reference: reference.to_string(),
            message: "secret is not valid UTF-8".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapResolver(HashMap<&'static str, &'static str>);

    impl SecretResolver for MapResolver {
        async fn ensure_available(&self) -> Result<(), SecretError> {
            Ok(())
        }

        async fn resolve(&self, reference: &str) -> Result<String, SecretError> {
            self.0
                .get(reference)
                .map(|v| (*v).to_string())
                .ok_or_else(|| SecretError::Resolve {
                    reference: reference.to_string(),
                    message: "not found".to_string(),
                })
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            SecretValue::classify("op://v/i/f"),
            SecretValue::Reference("op://v/i/f".to_string())
        );
        assert_eq!(
            SecretValue::classify("plain"),
            SecretValue::Literal("plain".to_string())
        );
        // Prefix must be at the start and exact.
        assert!(!SecretValue::classify(" op://v/i/f").is_reference());
        assert!(!SecretValue::classify("OP://v/i/f").is_reference());
        assert!(!SecretValue::classify("").is_reference());
    }

    #[tokio::test]
    async fn test_resolve_value() {
        let resolver = MapResolver(HashMap::from([("op://v/i/f", "s3cr3t")]));

        let literal = resolve_value(&resolver, &SecretValue::classify("mydb")).await;
        assert_eq!(literal.unwrap(), "mydb");

        let secret = resolve_value(&resolver, &SecretValue::classify("op://v/i/f")).await;
        assert_eq!(secret.unwrap(), "s3cr3t");

        let missing = resolve_value(&resolver, &SecretValue::classify("op://v/i/x")).await;
        assert!(matches!(missing, Err(SecretError::Resolve { .. })));
    }

    #[tokio::test]
    async fn test_missing_program_is_unavailable() {
        let resolver = OnePasswordCli::with_program("ssm-csv-test-no-such-program");
        let err = resolver.ensure_available().await.unwrap_err();
        assert!(matches!(err, SecretError::Unavailable { .. }));
    }
}
