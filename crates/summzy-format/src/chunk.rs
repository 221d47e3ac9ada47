//! Splitting rendered text into platform-sized messages.

use crate::util::utf16_len;

/// Errors from [`chunk`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ChunkError {
    #[error("Maximum chunk length must be greater than zero")]
    InvalidLength,
}

/// Split `text` into pieces of at most `max_len` UTF-16 units.
///
/// Lines are packed greedily, joined by `\n`. A line longer than `max_len`
/// is cut into consecutive pieces on character boundaries; a single
/// character wider than `max_len` still gets a chunk of its own. Empty
/// chunks, left by blank lines that fit nowhere else, are dropped; everything
/// else, whitespace included, is kept.
///
/// Text that already fits is returned as one chunk, even when empty.
///
/// # Example
///
/// ```
/// use summzy_format::chunk;
///
/// assert_eq!(chunk("abcdefghij", 4).unwrap(), vec!["abcd", "efgh", "ij"]);
/// assert_eq!(chunk("one\ntwo", 4).unwrap(), vec!["one", "two"]);
/// ```
pub fn chunk(text: &str, max_len: usize) -> Result<Vec<String>, ChunkError> {
    if max_len == 0 {
        return Err(ChunkError::InvalidLength);
    }
    if utf16_len(text) <= max_len {
        return Ok(vec![text.to_owned()]);
    }

    let mut chunks = Vec::new();
    let mut current: Option<String> = None;
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = utf16_len(line);

        if let Some(buffer) = current.as_mut()
            && current_len + 1 + line_len <= max_len
        {
            buffer.push('\n');
            buffer.push_str(line);
            current_len += 1 + line_len;
            continue;
        }

        if let Some(buffer) = current.take() {
            push_chunk(&mut chunks, buffer);
        }

        if line_len <= max_len {
            current = Some(line.to_owned());
            current_len = line_len;
        } else {
            split_line(line, line_len, max_len, &mut chunks);
        }
    }

    if let Some(buffer) = current {
        push_chunk(&mut chunks, buffer);
    }
    Ok(chunks)
}

fn push_chunk(chunks: &mut Vec<String>, chunk: String) {
    if chunk.is_empty() {
        tracing::debug!("Dropping empty chunk");
    } else {
        chunks.push(chunk);
    }
}

fn split_line(line: &str, line_len: usize, max_len: usize, chunks: &mut Vec<String>) {
    tracing::debug!(line_len, max_len, "Splitting line longer than one message");

    let mut piece = String::new();
    let mut piece_len = 0;
    for c in line.chars() {
        let width = c.len_utf16();
        if piece_len + width > max_len && !piece.is_empty() {
            push_chunk(chunks, std::mem::take(&mut piece));
            piece_len = 0;
        }
        piece.push(c);
        piece_len += width;
    }
    if !piece.is_empty() {
        push_chunk(chunks, piece);
    }
}
