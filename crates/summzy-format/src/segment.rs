//! Token lines parsed into a formatting tree.

use crate::normalize::{SpanKind, Token};

/// A node of rendered message structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, escaped on render.
    Text(String),
    Bold(Vec<Segment>),
    Italic(Vec<Segment>),
    Strikethrough(Vec<Segment>),
    Spoiler(Vec<Segment>),
    Link { text: Vec<Segment>, url: String },
    /// Quoted line content.
    Blockquote(Vec<Segment>),
    HorizontalRule,
}

impl Segment {
    fn span(kind: SpanKind, children: Vec<Self>) -> Self {
        match kind {
            SpanKind::Bold => Self::Bold(children),
            SpanKind::Italic => Self::Italic(children),
            SpanKind::Strikethrough => Self::Strikethrough(children),
            SpanKind::Spoiler => Self::Spoiler(children),
        }
    }
}

/// Parse one normalized line.
///
/// Spans pair an opening marker with the matching closing marker of the same
/// kind, counting nested markers of that kind. A marker without a partner
/// turns the rest of the line into literal text written as the original
/// markdown, so a malformed line still renders every character it had.
///
/// # Example
///
/// ```
/// use summzy_format::{Segment, normalize, resolve_line};
///
/// let lines = normalize("**a** b");
/// assert_eq!(
///     resolve_line(&lines[0]),
///     vec![
///         Segment::Bold(vec![Segment::Text("a".to_owned())]),
///         Segment::Text(" b".to_owned()),
///     ]
/// );
/// ```
pub fn resolve_line(tokens: &[Token]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut idx = 0;

    while let Some(token) = tokens.get(idx) {
        match token {
            Token::Char(c) | Token::Escaped(c) => {
                text.push(*c);
                idx += 1;
            }
            Token::Rule => {
                flush_text(&mut text, &mut segments);
                segments.push(Segment::HorizontalRule);
                idx += 1;
            }
            Token::Quote => {
                flush_text(&mut text, &mut segments);
                segments.push(Segment::Blockquote(resolve_line(&tokens[idx + 1..])));
                break;
            }
            Token::Open(kind, _) => {
                let Some(end) = find_close(tokens, idx, *kind) else {
                    degrade(&tokens[idx..], &mut text);
                    break;
                };
                flush_text(&mut text, &mut segments);
                let children = resolve_line(&tokens[idx + 1..end]);
                segments.push(Segment::span(*kind, children));
                idx = end + 1;
            }
            Token::LinkStart => {
                let Some((end, url)) = find_link_end(tokens, idx) else {
                    degrade(&tokens[idx..], &mut text);
                    break;
                };
                flush_text(&mut text, &mut segments);
                segments.push(Segment::Link {
                    text: resolve_line(&tokens[idx + 1..end]),
                    url: url.to_owned(),
                });
                idx = end + 1;
            }
            Token::Close(..) | Token::LinkEnd { .. } => {
                degrade(&tokens[idx..], &mut text);
                break;
            }
        }
    }

    flush_text(&mut text, &mut segments);
    segments
}

fn flush_text(text: &mut String, segments: &mut Vec<Segment>) {
    if !text.is_empty() {
        segments.push(Segment::Text(std::mem::take(text)));
    }
}

fn degrade(rest: &[Token], text: &mut String) {
    tracing::trace!(tokens = rest.len(), "Unbalanced marker, keeping rest of line literal");
    for token in rest {
        token.push_literal(text);
    }
}

fn find_close(tokens: &[Token], open: usize, kind: SpanKind) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(open + 1) {
        match token {
            Token::Open(k, _) if *k == kind => depth += 1,
            Token::Close(k, _) if *k == kind => {
                if depth == 0 {
                    return Some(idx);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}

fn find_link_end(tokens: &[Token], start: usize) -> Option<(usize, &str)> {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate().skip(start + 1) {
        match token {
            Token::LinkStart => depth += 1,
            Token::LinkEnd { url, .. } => {
                if depth == 0 {
                    return Some((idx, url.as_str()));
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    None
}
