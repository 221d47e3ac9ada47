//! Plain-text fallback for messages the platform refuses to parse.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::render::RULE_GLYPH;

/// Passes always allowed; real input settles in two or three.
const MIN_PASSES: usize = 8;

/// Remove markdown and `MarkdownV2` formatting, keeping readable text.
///
/// Code keeps its body, links and images keep their display text, list items
/// are written as `• ` or `N. ` lines, and escapes are resolved. Stripping is
/// repeated until the text stops changing, so stripping stripped text is a
/// no-op. Nested escapes lose one layer per pass, so the pass limit grows
/// with the input length.
///
/// # Example
///
/// ```
/// use summzy_format::strip_formatting;
///
/// assert_eq!(strip_formatting(r"*Total:* $5\.00 \(approx\)"), "Total: $5.00 (approx)");
/// ```
pub fn strip_formatting(text: &str) -> String {
    let max_passes = text.len().max(MIN_PASSES);
    let mut current = PlainText::render(text);
    for _ in 1..max_passes {
        let next = PlainText::render(&current);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Single stripping pass over a `pulldown-cmark` event stream.
#[derive(Default)]
struct PlainText {
    output: String,
    /// Next number for ordered lists, `None` for bullet lists.
    list_stack: Vec<Option<u64>>,
    /// An item marker was just written and no content followed yet.
    fresh_item: bool,
}

impl PlainText {
    fn render(text: &str) -> String {
        let mut state = Self::default();
        for event in Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH) {
            state.process_event(event);
        }
        state.output.trim().to_owned()
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(&tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.push_content(&text);
            }
            Event::SoftBreak | Event::HardBreak => self.output.push('\n'),
            Event::Rule => {
                self.start_block();
                self.output.push_str(RULE_GLYPH);
            }
            Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_)
            | Event::TaskListMarker(_) => {
                // Not enabled
            }
        }
    }

    fn start_tag(&mut self, tag: &Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::Heading { .. } | Tag::CodeBlock(_) => self.start_block(),
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.start_block();
                }
                self.list_stack.push(*start);
            }
            Tag::Item => self.start_item(),
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::CodeBlock => {
                let len = self.output.trim_end_matches('\n').len();
                self.output.truncate(len);
            }
            TagEnd::List(_) => {
                self.list_stack.pop();
            }
            _ => {}
        }
    }

    fn push_content(&mut self, text: &str) {
        self.fresh_item = false;
        self.output.push_str(text);
    }

    /// Separate a new block from previous output: a blank line at top
    /// level, a single newline inside lists.
    fn start_block(&mut self) {
        if std::mem::take(&mut self.fresh_item) || self.output.is_empty() {
            return;
        }
        let wanted = if self.list_stack.is_empty() { 2 } else { 1 };
        let present = self.output.len() - self.output.trim_end_matches('\n').len();
        for _ in present..wanted {
            self.output.push('\n');
        }
    }

    fn start_item(&mut self) {
        if !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        match self.list_stack.last_mut() {
            Some(Some(number)) => {
                self.output.push_str(&format!("{number}. "));
                *number += 1;
            }
            _ => self.output.push_str("• "),
        }
        self.fresh_item = true;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(strip_formatting("just words"), "just words");
    }

    #[test]
    fn test_dialect_output_is_unescaped() {
        assert_eq!(
            strip_formatting(r"*Total:* $5\.00 \(approx\)\!"),
            "Total: $5.00 (approx)!"
        );
    }

    #[test]
    fn test_emphasis_removed() {
        assert_eq!(
            strip_formatting("**bold** and _it_ and ~~gone~~"),
            "bold and it and gone"
        );
    }

    #[test]
    fn test_code_keeps_body() {
        assert_eq!(strip_formatting("```rust\nfn main() {}\n```"), "fn main() {}");
        assert_eq!(strip_formatting("run `ls` now"), "run ls now");
    }

    #[test]
    fn test_links_and_images_keep_text() {
        assert_eq!(
            strip_formatting("see [docs](https://docs.rs) ![logo](x.png)"),
            "see docs logo"
        );
    }

    #[test]
    fn test_heading_and_paragraphs() {
        assert_eq!(strip_formatting("# Title\n\nBody"), "Title\n\nBody");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(strip_formatting("> quoted"), "quoted");
    }

    #[test]
    fn test_lists() {
        assert_eq!(strip_formatting("- a\n- b"), "• a\n• b");
        assert_eq!(strip_formatting("1. one\n2. two"), "1. one\n2. two");
        assert_eq!(strip_formatting("- a\n\n- b"), "• a\n• b");
    }

    #[test]
    fn test_nested_list() {
        // Indentation would read as paragraph continuation on the next pass
        assert_eq!(strip_formatting("- a\n  - b"), "• a\n• b");
    }

    #[test]
    fn test_rule() {
        assert_eq!(strip_formatting("a\n\n---\n\nb"), "a\n\n———\n\nb");
    }

    #[test]
    fn test_output_is_trimmed() {
        assert_eq!(strip_formatting("\n\n  text  \n\n"), "text");
    }

    #[test]
    fn test_idempotent() {
        let once = strip_formatting(r"\*star\* and \_under\_");
        assert_eq!(once, "star and under");
        assert_eq!(strip_formatting(&once), once);
    }

    #[test]
    fn test_long_backslash_run_settles() {
        let rendered = crate::format_markdown(&"\\".repeat(1024));
        let once = strip_formatting(&rendered);
        assert_eq!(once, "\\");
        assert_eq!(strip_formatting(&once), once);
    }

    #[test]
    fn test_idempotent_on_rendered_markdown() {
        let inputs = [
            "Cost is $5.00 (approx)!".to_owned(),
            "# Title\n\n**bold *italic* text** and ~~old~~ ||hidden||".to_owned(),
            "> quoted _line_\n\n1. one\n2. two\n- bullet\n\n---".to_owned(),
            "[docs](https://docs.rs/a_(b)) ![logo](x.png) `code_here`".to_owned(),
            "```rust\nlet x = a * b;\n```\nafter".to_owned(),
            r"literal \*star\* and \_under\_ and \\".to_owned(),
            "&amp;amp;amp; &lt;tag&gt;".to_owned(),
            "*text_ **open [link(".to_owned(),
            "\\".repeat(300) + "*" + &"_".repeat(200),
            "- a\n  - b\n    - c".to_owned(),
        ];
        for input in &inputs {
            let once = strip_formatting(&crate::format_markdown(input));
            assert_eq!(strip_formatting(&once), once, "input: {input:?}");
        }
    }
}
