//! `summzy length` and `summzy urls` command implementations.

use clap::Args;
use summzy_format::{TELEGRAM_MAX_MESSAGE_LENGTH, extract_first_url, extract_urls, utf16_len};

use super::InputArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the length command.
#[derive(Args)]
pub(crate) struct LengthArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Keep a trailing newline as part of the text.
    #[arg(long)]
    keep_newline: bool,
}

impl LengthArgs {
    /// Execute the length command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let raw = self.input.read()?;
        let text = if self.keep_newline {
            raw.as_str()
        } else {
            raw.strip_suffix('\n').unwrap_or(&raw)
        };

        let length = utf16_len(text);
        output.result(&length.to_string())?;
        if length > TELEGRAM_MAX_MESSAGE_LENGTH {
            output.warning(&format!(
                "Longer than one Telegram message ({TELEGRAM_MAX_MESSAGE_LENGTH} units)"
            ));
        }
        Ok(())
    }
}

/// Arguments for the urls command.
#[derive(Args)]
pub(crate) struct UrlsArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Print only the first URL.
    #[arg(long)]
    first: bool,
}

impl UrlsArgs {
    /// Execute the urls command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let text = self.input.read()?;

        if self.first {
            if let Some(url) = extract_first_url(&text) {
                output.result(&url)?;
            }
            return Ok(());
        }

        for url in extract_urls(&text) {
            output.result(&url)?;
        }
        Ok(())
    }
}
