//! CLI command implementations.

pub(crate) mod format;
pub(crate) mod inspect;
pub(crate) mod strip;

use std::io::Read;
use std::path::PathBuf;

use clap::Args;

use crate::error::CliError;

pub(crate) use format::{EscapeArgs, FormatArgs};
pub(crate) use inspect::{LengthArgs, UrlsArgs};
pub(crate) use strip::{SanitizeArgs, StripArgs};

/// Input source shared by all commands.
#[derive(Args)]
pub(crate) struct InputArgs {
    /// File to read (default: stdin).
    file: Option<PathBuf>,
}

impl InputArgs {
    /// Read the whole input as UTF-8.
    pub(crate) fn read(&self) -> Result<String, CliError> {
        match &self.file {
            Some(path) => Ok(std::fs::read_to_string(path)?),
            None => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}
