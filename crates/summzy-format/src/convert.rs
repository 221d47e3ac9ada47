//! Public conversion entry points.

use crate::code;
use crate::normalize::normalize;
use crate::render::{escape_text, render};
use crate::segment::resolve_line;

/// Convert markdown to Telegram `MarkdownV2`.
///
/// Every reserved character outside a recognized construct ends up escaped
/// exactly once, code is passed through verbatim, and markup that does not
/// close on its own line is kept as literal text.
///
/// # Example
///
/// ```
/// use summzy_format::format_markdown;
///
/// assert_eq!(format_markdown("# Notes\n- *fast*"), "*Notes*\n• _fast_");
/// ```
pub fn format_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let (stripped, regions) = code::extract(text);
    let rendered = normalize(&stripped)
        .iter()
        .map(|line| render(&resolve_line(line)))
        .collect::<Vec<_>>()
        .join("\n");
    code::restore(&rendered, &regions)
}

/// Escape text for `MarkdownV2` without interpreting any markdown.
///
/// Code regions are still preserved, so pre-formatted snippets survive.
pub fn escape_only(text: &str) -> String {
    let (stripped, regions) = code::extract(text);
    code::restore(&escape_text(&stripped), &regions)
}
