//! Terminal-backed prompt using dialoguer

use super::Prompt;
use crate::error::{Error, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, MultiSelect, Select};

/// Rows shown before the list starts scrolling
const PAGE_SIZE: usize = 15;

/// Prompts answered interactively on the terminal
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn select_one(&self, message: &str, items: &[String]) -> Result<usize> {
        Select::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(items)
            .default(0)
            .max_length(PAGE_SIZE)
            .interact()
            .map_err(prompt_error)
    }

    fn select_many(
        &self,
        message: &str,
        items: &[String],
        defaults: &[bool],
    ) -> Result<Vec<usize>> {
        MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .items(items)
            .defaults(defaults)
            .max_length(PAGE_SIZE)
            .interact()
            .map_err(prompt_error)
    }

    fn confirm(&self, message: &str) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

/// Ctrl-C surfaces as an interrupted read; treat it as a clean abort
fn prompt_error(err: dialoguer::Error) -> Error {
    match err {
        dialoguer::Error::IO(ref io) if io.kind() == std::io::ErrorKind::Interrupted => {
            Error::Aborted
        }
        other => Error::Prompt(other.to_string()),
    }
}
