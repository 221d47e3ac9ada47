//! `MarkdownV2` rendering of segment trees.
//!
//! Escaping is context-sensitive: text escapes every reserved character,
//! link targets only `)` and `\`.

use crate::normalize::SpanKind;
use crate::segment::Segment;

/// Literal used for horizontal rules, which the dialect cannot express.
pub const RULE_GLYPH: &str = "———";

/// Whether `c` must be backslash-escaped in `MarkdownV2` text.
pub fn is_reserved(c: char) -> bool {
    matches!(
        c,
        '_' | '*'
            | '['
            | ']'
            | '('
            | ')'
            | '~'
            | '`'
            | '>'
            | '#'
            | '+'
            | '-'
            | '='
            | '|'
            | '{'
            | '}'
            | '.'
            | '!'
            | '\\'
    )
}

/// Escape every reserved character in `text`.
///
/// # Example
///
/// ```
/// use summzy_format::escape_text;
///
/// assert_eq!(escape_text("1+1=2."), r"1\+1\=2\.");
/// ```
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(text, &mut out);
    out
}

/// Escape a link target, where only `)` and `\` are special.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    push_escaped_url(url, &mut out);
    out
}

fn push_escaped(text: &str, out: &mut String) {
    for c in text.chars() {
        if is_reserved(c) {
            out.push('\\');
        }
        out.push(c);
    }
}

fn push_escaped_url(url: &str, out: &mut String) {
    for c in url.chars() {
        if matches!(c, ')' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
}

impl SpanKind {
    /// Dialect marker written on both sides of the span.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Bold => "*",
            Self::Italic => "_",
            Self::Strikethrough => "~",
            Self::Spoiler => "||",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Spans currently open around the segment being written.
///
/// The dialect has no meaning for a span nested in one of its own kind, and
/// writing the marker again would close the outer span early.
#[derive(Clone, Copy, Default)]
struct ActiveSpans(u8);

impl ActiveSpans {
    fn contains(self, kind: SpanKind) -> bool {
        self.0 & kind.bit() != 0
    }

    fn with(self, kind: SpanKind) -> Self {
        Self(self.0 | kind.bit())
    }
}

/// Render segments as `MarkdownV2`.
pub fn render(segments: &[Segment]) -> String {
    let mut writer = Writer::default();
    writer.write_segments(segments, ActiveSpans::default());
    writer.out
}

#[derive(Default)]
struct Writer {
    out: String,
    /// Kind of the span whose closing marker ends `out`, and `out`'s length then.
    just_closed: Option<(SpanKind, usize)>,
}

impl Writer {
    fn write_segments(&mut self, segments: &[Segment], active: ActiveSpans) {
        for segment in segments {
            match segment {
                Segment::Text(text) => push_escaped(text, &mut self.out),
                Segment::Bold(children) => self.write_span(SpanKind::Bold, children, active),
                Segment::Italic(children) => self.write_span(SpanKind::Italic, children, active),
                Segment::Strikethrough(children) => {
                    self.write_span(SpanKind::Strikethrough, children, active);
                }
                Segment::Spoiler(children) => {
                    self.write_span(SpanKind::Spoiler, children, active);
                }
                Segment::Link { text, url } => {
                    self.out.push('[');
                    self.write_segments(text, active);
                    self.out.push_str("](");
                    push_escaped_url(url, &mut self.out);
                    self.out.push(')');
                }
                Segment::Blockquote(children) => {
                    self.out.push('>');
                    self.write_segments(children, active);
                }
                Segment::HorizontalRule => push_escaped(RULE_GLYPH, &mut self.out),
            }
        }
    }

    fn write_span(&mut self, kind: SpanKind, children: &[Segment], active: ActiveSpans) {
        if active.contains(kind) {
            self.write_segments(children, active);
            return;
        }

        let marker = kind.marker();
        // Back-to-back markers of one kind are ambiguous (`__` is underline),
        // so a span opening where the same kind just closed continues it.
        if self.just_closed == Some((kind, self.out.len())) {
            self.out.truncate(self.out.len() - marker.len());
        } else {
            self.out.push_str(marker);
        }
        self.write_segments(children, active.with(kind));
        self.out.push_str(marker);
        self.just_closed = Some((kind, self.out.len()));
    }
}
