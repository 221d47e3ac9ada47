//! Ready-to-send message payloads.

use crate::chunk::{ChunkError, chunk};
use crate::convert::format_markdown;
use crate::plain::strip_formatting;

/// One platform message: the formatted text and its plain fallback.
///
/// Send `formatted` with `MarkdownV2` parsing; if the platform rejects it,
/// send `plain` without parsing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub formatted: String,
    pub plain: String,
}

/// Render markdown and split it into messages of at most `max_len` UTF-16 units.
///
/// The fallback is derived from each formatted chunk, so both variants of a
/// message carry the same content.
pub fn prepare_messages(text: &str, max_len: usize) -> Result<Vec<OutgoingMessage>, ChunkError> {
    let rendered = format_markdown(text);
    let chunks = chunk(&rendered, max_len)?;
    tracing::debug!(
        input_len = text.len(),
        chunks = chunks.len(),
        "Prepared outgoing messages"
    );

    Ok(chunks
        .into_iter()
        .map(|formatted| {
            let plain = strip_formatting(&formatted);
            OutgoingMessage { formatted, plain }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::util::utf16_len;

    #[test]
    fn test_single_message() {
        let messages = prepare_messages("**Total:** $5.00 (approx)!", 4096).unwrap();
        assert_eq!(
            messages,
            vec![OutgoingMessage {
                formatted: r"*Total:* $5\.00 \(approx\)\!".to_owned(),
                plain: "Total: $5.00 (approx)!".to_owned(),
            }]
        );
    }

    #[test]
    fn test_long_text_is_split() {
        let text = "Line with some words.\n".repeat(40);
        let messages = prepare_messages(&text, 100).unwrap();
        assert!(messages.len() > 1);
        for message in &messages {
            assert!(utf16_len(&message.formatted) <= 100);
            assert!(!message.plain.is_empty());
            assert!(!message.plain.contains('\\'));
        }
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(prepare_messages("x", 0), Err(ChunkError::InvalidLength));
    }
}
