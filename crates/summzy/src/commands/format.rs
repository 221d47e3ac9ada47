//! `summzy format` and `summzy escape` command implementations.

use std::path::PathBuf;

use clap::Args;
use summzy_config::{CliSettings, Config};
use summzy_format::{
    escape_only, format_markdown, prepare_messages, sanitize_assistant_output, utf16_len,
};

use super::InputArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the format command.
#[derive(Args)]
pub(crate) struct FormatArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Path to configuration file (default: auto-discover summzy.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Split the output into platform-sized messages.
    #[arg(long)]
    chunk: bool,

    /// Maximum message length in UTF-16 units (overrides config).
    #[arg(short, long, env = "MAX_TELEGRAM_MESSAGE_LENGTH")]
    max_length: Option<usize>,

    /// Also print the plain-text fallback of every message.
    #[arg(long, requires = "chunk")]
    plain: bool,

    /// Remove echoed bot status lines before formatting.
    #[arg(long)]
    sanitize: bool,
}

impl FormatArgs {
    /// Execute the format command.
    ///
    /// # Errors
    ///
    /// Returns an error if input can't be read or configuration fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let mut text = self.input.read()?;
        if self.sanitize {
            text = sanitize_assistant_output(&text);
        }

        if !self.chunk {
            output.result(&format_markdown(&text))?;
            return Ok(());
        }

        let cli_settings = CliSettings {
            max_message_length: self.max_length,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let max_len = config.telegram_resolved.max_message_length;

        let messages = prepare_messages(&text, max_len)?;
        tracing::info!(messages = messages.len(), max_len, "Formatted input");

        let total = messages.len();
        for (index, message) in messages.iter().enumerate() {
            output.highlight(&format!(
                "Message {}/{total} ({} units)",
                index + 1,
                utf16_len(&message.formatted)
            ));
            output.result(&message.formatted)?;
            if self.plain {
                output.separator();
                output.result(&message.plain)?;
            }
        }

        Ok(())
    }
}

/// Arguments for the escape command.
#[derive(Args)]
pub(crate) struct EscapeArgs {
    #[command(flatten)]
    input: InputArgs,
}

impl EscapeArgs {
    /// Execute the escape command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let text = self.input.read()?;
        Output::new().result(&escape_only(&text))?;
        Ok(())
    }
}
