//! Interactive confirmation behind an injectable [`Prompt`].
use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;

/// Asks the user a yes/no question.
pub trait Prompt: Send + Sync + std::fmt::Debug {
    /// Ask `question`; `false` means the user declined.
    ///
    /// # Errors
    ///
    /// Returns an error if the answer cannot be read (e.g. no terminal).
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Terminal prompt using `dialoguer`. Defaults to "no".
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .context("Failed to read user input")
    }
}

/// Prompt that always gives the same answer without asking.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fixed_answer_returns_its_value() {
        assert!(FixedAnswer(true).confirm("overwrite?").unwrap());
        assert!(!FixedAnswer(false).confirm("overwrite?").unwrap());
    }
}
