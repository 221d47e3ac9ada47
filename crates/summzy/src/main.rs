//! summzy CLI - Telegram `MarkdownV2` formatting.
//!
//! Provides commands for:
//! - `format`: Convert markdown to `MarkdownV2`, optionally split into messages
//! - `escape`: Escape text without interpreting markdown
//! - `strip`: Produce the plain-text fallback
//! - `sanitize`: Drop echoed bot status lines from model output
//! - `length`: Measure text in UTF-16 units
//! - `urls`: List URLs found in text

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EscapeArgs, FormatArgs, LengthArgs, SanitizeArgs, StripArgs, UrlsArgs};
use output::Output;

/// summzy - Telegram MarkdownV2 formatting.
#[derive(Parser)]
#[command(name = "summzy", version, about)]
struct Cli {
    /// Enable verbose output (show chunking and config logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown to MarkdownV2.
    Format(FormatArgs),
    /// Escape text for MarkdownV2 without interpreting markdown.
    Escape(EscapeArgs),
    /// Strip formatting, leaving plain text.
    Strip(StripArgs),
    /// Remove echoed bot status lines from model output.
    Sanitize(SanitizeArgs),
    /// Print the length of the text in UTF-16 units.
    Length(LengthArgs),
    /// List URLs found in the text.
    Urls(UrlsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Format(args) => args.execute(),
        Commands::Escape(args) => args.execute(),
        Commands::Strip(args) => args.execute(),
        Commands::Sanitize(args) => args.execute(),
        Commands::Length(args) => args.execute(),
        Commands::Urls(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_format_with_chunking() {
        let cli = Cli::try_parse_from(["summzy", "format", "notes.md", "--chunk", "-m", "2000"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Format(_)));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_plain_requires_chunk() {
        assert!(Cli::try_parse_from(["summzy", "format", "--plain"]).is_err());
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["summzy", "urls", "-v"]).unwrap();
        assert!(cli.verbose);
    }
}
