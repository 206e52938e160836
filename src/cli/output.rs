//! Human-readable status lines.
//!
//! Informational lines go to stdout and respect `--quiet`. Warnings go to
//! stderr and always print.

use colored::Colorize;

/// Success line (green).
pub fn success(message: &str) {
    if !crate::is_quiet() {
        println!("{}", message.green().bold());
    }
}

/// Informational line.
pub fn info(message: &str) {
    if !crate::is_quiet() {
        println!("{message}");
    }
}

/// Warning line (yellow, stderr).
pub fn warn(message: &str) {
    eprintln!("{}", message.yellow());
}

/// Section heading (cyan).
pub fn heading(message: &str) {
    if !crate::is_quiet() {
        println!("{}", message.cyan().bold());
    }
}

/// Print a JSON value on one line.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn json(value: &serde_json::Value) -> crate::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
