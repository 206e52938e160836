//! Confirmation prompts.

use crate::error::Result;

/// Yes/no gate in front of every store-facing flow.
pub trait Confirm {
    /// Ask `message`; `true` means proceed.
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt cannot be shown (e.g. no terminal).
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Terminal prompt backed by `inquire`. Defaults to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompt;

impl Confirm for InteractivePrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        match inquire::Confirm::new(message).with_default(false).prompt() {
            Ok(answer) => Ok(answer),
            // Esc and Ctrl-C decline rather than fail.
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Answers every prompt the same way without asking.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, message: &str) -> Result<bool> {
        tracing::debug!(message, answer = self.0, "Confirmation answered without prompting");
        Ok(self.0)
    }
}
