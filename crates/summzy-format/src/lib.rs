//! Markdown to Telegram `MarkdownV2` conversion.
//!
//! Telegram's `MarkdownV2` dialect requires every reserved character outside a
//! formatting construct to be backslash-escaped, and rejects a whole message
//! when a single marker is left unclosed. This crate rewrites ordinary
//! markdown (as produced by language models) into that dialect.
//!
//! # Architecture
//!
//! Conversion is a linear pipeline, run per call with no shared state:
//!
//! 1. [`code::extract`]: fenced blocks and inline code become placeholders
//! 2. [`normalize`]: each line becomes a [`Token`] stream with span markers
//! 3. [`resolve_line`]: tokens are parsed into a [`Segment`] tree
//! 4. [`render()`]: segments are written out with context-sensitive escaping
//! 5. [`code::restore`]: placeholders are swapped back for the original code
//!
//! [`chunk`] splits a rendered string into platform-sized messages, and
//! [`strip_formatting`] produces the plain-text fallback used when Telegram
//! refuses a formatted message.
//!
//! # Example
//!
//! ```
//! use summzy_format::{chunk, format_markdown};
//!
//! let rendered = format_markdown("**Total:** $5.00 (approx)!");
//! assert_eq!(rendered, r"*Total:* $5\.00 \(approx\)\!");
//!
//! let chunks = chunk(&rendered, 4096).unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```

mod chunk;
pub mod code;
mod convert;
mod message;
mod normalize;
mod plain;
mod render;
mod replacements;
mod sanitize;
mod segment;
mod urls;
mod util;

pub use chunk::{ChunkError, chunk};
pub use code::CodeRegions;
pub use convert::{escape_only, format_markdown};
pub use message::{OutgoingMessage, prepare_messages};
pub use normalize::{SpanKind, Token, TokenLine, normalize};
pub use plain::strip_formatting;
pub use render::{RULE_GLYPH, escape_text, escape_url, is_reserved, render};
pub use sanitize::sanitize_assistant_output;
pub use segment::{Segment, resolve_line};
pub use urls::{extract_first_url, extract_urls};
pub use util::utf16_len;

/// Telegram's hard limit on the length of one text message, in UTF-16 units.
pub const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;
