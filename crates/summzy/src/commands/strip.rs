//! `summzy strip` and `summzy sanitize` command implementations.

use clap::Args;
use summzy_format::{sanitize_assistant_output, strip_formatting};

use super::InputArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the strip command.
#[derive(Args)]
pub(crate) struct StripArgs {
    #[command(flatten)]
    input: InputArgs,
}

impl StripArgs {
    /// Execute the strip command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = self.input.read()?;
        Output::new().result(&strip_formatting(&text))?;
        Ok(())
    }
}

/// Arguments for the sanitize command.
#[derive(Args)]
pub(crate) struct SanitizeArgs {
    #[command(flatten)]
    input: InputArgs,
}

impl SanitizeArgs {
    /// Execute the sanitize command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = self.input.read()?;
        Output::new().result(&sanitize_assistant_output(&text))?;
        Ok(())
    }
}
