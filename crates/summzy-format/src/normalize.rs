//! Markdown normalization into per-line token streams.
//!
//! Each line of (code-free) input becomes a [`TokenLine`]. Recognized
//! markdown constructs are replaced by marker tokens that cannot be confused
//! with literal characters, so later rules never re-match the output of
//! earlier ones. Rules run in a fixed order, each as one left-to-right pass
//! over the line:
//!
//! 1. backslash escapes of reserved characters become [`Token::Escaped`]
//! 2. headings (`#` to `######`) become bold spans
//! 3. thematic breaks (`---`, `***`, `___`, 3+ characters) become [`Token::Rule`]
//! 4. images collapse to their alt text
//! 5. links become [`Token::LinkStart`] .. [`Token::LinkEnd`]
//! 6. `***x***`, `___x___`, `**_x_**`, `__*x*__` become bold wrapping italic
//! 7. `**x**` and `__x__` become bold
//! 8. `*x*` and `_x_` become italic
//! 9. `~~x~~` and `||x||` become strikethrough and spoiler
//! 10. leading `>` markers collapse into a single [`Token::Quote`]
//! 11. ordered list numbers keep their digits with an escaped period
//! 12. `-` and `*` bullets become `•`
//!
//! Delimiters only ever match [`Token::Char`]; span content may contain any
//! token, which is how spans nest.

use crate::render::{RULE_GLYPH, is_reserved};

/// Kind of an inline formatting span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Bold,
    Italic,
    Strikethrough,
    Spoiler,
}

/// One unit of a normalized line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// A literal character.
    Char(char),
    /// A reserved character that was backslash-escaped in the input.
    Escaped(char),
    /// Start of a span, with the markdown it was written as.
    Open(SpanKind, &'static str),
    /// End of a span, with the markdown it was written as.
    Close(SpanKind, &'static str),
    /// Start of a link's display text.
    LinkStart,
    /// End of a link's display text.
    LinkEnd {
        /// Link target with input escapes resolved.
        url: String,
        /// The `](target "title")` text the marker replaced.
        source: String,
    },
    /// A thematic break; only a trailing `\r` may follow it on its line.
    Rule,
    /// Blockquote marker; always the first token on its line.
    Quote,
}

impl Token {
    /// Append the text this token stands for when it is not treated as markup.
    pub fn push_literal(&self, out: &mut String) {
        match self {
            Self::Char(c) | Self::Escaped(c) => out.push(*c),
            Self::Open(_, source) | Self::Close(_, source) => out.push_str(source),
            Self::LinkStart => out.push('['),
            Self::LinkEnd { source, .. } => out.push_str(source),
            Self::Rule => out.push_str(RULE_GLYPH),
            Self::Quote => out.push('>'),
        }
    }
}

/// A single normalized line.
pub type TokenLine = Vec<Token>;

/// Normalize code-free markdown into one token line per input line.
///
/// Constructs never span lines: a marker that is not closed on its own line
/// stays literal text.
///
/// # Example
///
/// ```
/// use summzy_format::{SpanKind, Token, normalize};
///
/// let lines = normalize("**hi**");
/// assert_eq!(
///     lines[0],
///     vec![
///         Token::Open(SpanKind::Bold, "**"),
///         Token::Char('h'),
///         Token::Char('i'),
///         Token::Close(SpanKind::Bold, "**"),
///     ]
/// );
/// ```
pub fn normalize(text: &str) -> Vec<TokenLine> {
    text.split('\n').map(normalize_line).collect()
}

fn normalize_line(line: &str) -> TokenLine {
    // A CRLF ending is kept as a trailing literal so line-anchored rules still match.
    let (body, carriage_return) = match line.strip_suffix('\r') {
        Some(body) => (body, true),
        None => (line, false),
    };

    let mut tokens = tokenize(body);
    tokens = heading(tokens);
    tokens = thematic_break(tokens);
    let index = LinkIndex::new(&tokens);
    tokens = rewrite(&tokens, |line, start| image(line, start, &index));
    let index = LinkIndex::new(&tokens);
    tokens = rewrite(&tokens, |line, start| link(line, start, &index));
    for rule in DELIMITED_RULES {
        let closers = rule.closers(&tokens);
        tokens = rewrite(&tokens, |line, start| rule.apply(line, start, &closers));
    }
    tokens = blockquote(tokens);
    tokens = ordered_list(tokens);
    tokens = bullet_list(tokens);

    if carriage_return {
        tokens.push(Token::Char('\r'));
    }
    tokens
}

/// Split a line into characters, folding `\x` escapes of reserved characters.
fn tokenize(line: &str) -> TokenLine {
    let mut tokens = Vec::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && is_reserved(next)
        {
            chars.next();
            tokens.push(Token::Escaped(next));
        } else {
            tokens.push(Token::Char(c));
        }
    }
    tokens
}

/// Apply a rule at every position, left to right, without overlapping matches.
///
/// The rule sees the original line, so look-behind checks observe input
/// characters even when they were consumed by a previous match.
fn rewrite<F>(tokens: &[Token], mut rule: F) -> TokenLine
where
    F: FnMut(&[Token], usize) -> Option<(usize, Vec<Token>)>,
{
    let mut output = Vec::with_capacity(tokens.len());
    let mut idx = 0;
    while idx < tokens.len() {
        if let Some((end, replacement)) = rule(tokens, idx) {
            output.extend(replacement);
            idx = end;
        } else {
            output.push(tokens[idx].clone());
            idx += 1;
        }
    }
    output
}

fn is_char(token: &Token, expected: char) -> bool {
    matches!(token, Token::Char(c) if *c == expected)
}

fn is_char_at(tokens: &[Token], idx: usize, expected: char) -> bool {
    tokens.get(idx).is_some_and(|token| is_char(token, expected))
}

fn is_space(token: &Token) -> bool {
    matches!(token, Token::Char(c) if c.is_whitespace())
}

/// Whether `delimiter` is spelled out by `Char` tokens starting at `at`.
fn matches_at(tokens: &[Token], at: usize, delimiter: &str) -> bool {
    delimiter
        .chars()
        .enumerate()
        .all(|(offset, expected)| is_char_at(tokens, at + offset, expected))
}

fn heading(tokens: TokenLine) -> TokenLine {
    let hashes = tokens.iter().take_while(|token| is_char(token, '#')).count();
    if !(1..=6).contains(&hashes) {
        return tokens;
    }
    let spaces = tokens[hashes..].iter().take_while(|t| is_space(t)).count();
    if spaces == 0 {
        return tokens;
    }
    // The title needs at least one token; a trailing space can serve as one.
    let content_start = (hashes + spaces).min(tokens.len() - 1);
    if content_start <= hashes {
        return tokens;
    }

    let mut output = Vec::with_capacity(tokens.len() - content_start + 2);
    output.push(Token::Open(SpanKind::Bold, ""));
    output.extend_from_slice(&tokens[content_start..]);
    output.push(Token::Close(SpanKind::Bold, ""));
    output
}

fn thematic_break(tokens: TokenLine) -> TokenLine {
    let is_break = tokens.len() >= 3
        && tokens
            .iter()
            .all(|token| matches!(token, Token::Char('-' | '*' | '_')));
    if is_break { vec![Token::Rule] } else { tokens }
}

/// For every position, the first position at or after it whose token is `wanted`.
///
/// Tables hold one entry per token plus one; the line length marks "none".
fn next_where(tokens: &[Token], wanted: impl Fn(&Token) -> bool) -> Vec<usize> {
    let len = tokens.len();
    let mut next = vec![len; len + 1];
    for idx in (0..len).rev() {
        next[idx] = if wanted(&tokens[idx]) {
            idx
        } else {
            next[idx + 1]
        };
    }
    next
}

/// Read a `next_where`-style table, mapping "none" to `None`.
fn lookup(table: &[usize], at: usize) -> Option<usize> {
    table.get(at).copied().filter(|&idx| idx + 1 < table.len())
}

/// Forward lookups over one line, built once per pass so that link and
/// image matching never rescans the rest of the line.
struct LinkIndex {
    next_bracket: Vec<usize>,
    next_paren: Vec<usize>,
    next_quote: Vec<usize>,
    next_non_space: Vec<usize>,
    /// End of the run of literal, non-whitespace characters starting here.
    run_end: Vec<usize>,
    /// Parenthesis depth before each position.
    depth: Vec<isize>,
    /// The `)` closing a target that starts here, skipping nested pairs.
    balanced_close: Vec<usize>,
}

impl LinkIndex {
    fn new(tokens: &[Token]) -> Self {
        let len = tokens.len();
        let mut depth = vec![0isize; len + 1];
        for (idx, token) in tokens.iter().enumerate() {
            depth[idx + 1] = depth[idx]
                + match token {
                    Token::Char('(') => 1,
                    Token::Char(')') => -1,
                    _ => 0,
                };
        }

        // Nearest later position where the depth drops below the depth here
        let mut balanced_close = vec![len; len + 1];
        let mut stack: Vec<usize> = Vec::new();
        for idx in (0..=len).rev() {
            while stack.last().is_some_and(|&top| depth[top] >= depth[idx]) {
                stack.pop();
            }
            if let Some(&top) = stack.last() {
                balanced_close[idx] = top - 1;
            }
            stack.push(idx);
        }

        Self {
            next_bracket: next_where(tokens, |t| is_char(t, ']')),
            next_paren: next_where(tokens, |t| is_char(t, ')')),
            next_quote: next_where(tokens, |t| is_char(t, '"')),
            next_non_space: next_where(tokens, |t| !is_space(t)),
            run_end: next_where(tokens, |t| !is_url_char(t)),
            depth,
            balanced_close,
        }
    }
}

fn is_url_char(token: &Token) -> bool {
    match token {
        Token::Char(c) => !c.is_whitespace(),
        Token::Escaped(_) => true,
        _ => false,
    }
}

/// `![alt](target)` becomes `alt`.
fn image(tokens: &[Token], start: usize, index: &LinkIndex) -> Option<(usize, Vec<Token>)> {
    if !matches_at(tokens, start, "![") {
        return None;
    }
    let alt_start = start + 2;
    let alt_end = lookup(&index.next_bracket, alt_start)?;
    if !is_char_at(tokens, alt_end + 1, '(') {
        return None;
    }
    let target_start = alt_end + 2;
    let target_end = lookup(&index.next_paren, target_start)?;
    if target_end == target_start {
        return None;
    }
    Some((target_end + 1, tokens[alt_start..alt_end].to_vec()))
}

/// `[text](target)` and `[text](target "title")`.
fn link(tokens: &[Token], start: usize, index: &LinkIndex) -> Option<(usize, Vec<Token>)> {
    if !is_char_at(tokens, start, '[') {
        return None;
    }
    let text_start = start + 1;
    let text_end = lookup(&index.next_bracket, text_start)?;
    if text_end == text_start || !is_char_at(tokens, text_end + 1, '(') {
        return None;
    }
    let target = balanced_target(tokens, text_end + 2, index)
        .or_else(|| first_paren_target(text_end + 2, index))?;

    let mut source = String::new();
    for token in &tokens[text_end..target.end] {
        token.push_literal(&mut source);
    }

    let mut replacement = Vec::with_capacity(text_end - text_start + 2);
    replacement.push(Token::LinkStart);
    replacement.extend_from_slice(&tokens[text_start..text_end]);
    replacement.push(Token::LinkEnd {
        url: collect_url(&tokens[text_end + 2..target.url_end]),
        source,
    });
    Some((target.end, replacement))
}

struct LinkTarget {
    /// Index just past the URL.
    url_end: usize,
    /// Index just past the closing parenthesis.
    end: usize,
}

fn collect_url(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Char(c) | Token::Escaped(c) => Some(*c),
            _ => None,
        })
        .collect()
}

/// Link target that may contain balanced parentheses, e.g. Wikipedia URLs.
fn balanced_target(tokens: &[Token], start: usize, index: &LinkIndex) -> Option<LinkTarget> {
    let run_end = index.run_end[start];
    let close = index.balanced_close[start];
    if close < run_end {
        return (close > start).then_some(LinkTarget {
            url_end: close,
            end: close + 1,
        });
    }

    // Whitespace outside any parenthesis may only introduce a title
    let balanced = index.depth[run_end] == index.depth[start];
    if run_end == start || !balanced || !tokens.get(run_end).is_some_and(is_space) {
        return None;
    }
    let end = skip_title(tokens, run_end, index)?;
    Some(LinkTarget {
        url_end: run_end,
        end,
    })
}

/// Target ending at the first `)`, for unbalanced parentheses.
fn first_paren_target(start: usize, index: &LinkIndex) -> Option<LinkTarget> {
    let close = lookup(&index.next_paren, start)?;
    (close > start && close < index.run_end[start]).then_some(LinkTarget {
        url_end: close,
        end: close + 1,
    })
}

/// Skip ` "title")` and return the index past the closing parenthesis.
fn skip_title(tokens: &[Token], start: usize, index: &LinkIndex) -> Option<usize> {
    let quote = index.next_non_space[start];
    if quote == start || !is_char_at(tokens, quote, '"') {
        return None;
    }
    let title_end = lookup(&index.next_quote, quote + 1)?;
    let close = title_end + 1;
    is_char_at(tokens, close, ')').then_some(close + 1)
}

/// A span written as `open content close`, like `**bold**`.
struct Delimited {
    open: &'static str,
    close: &'static str,
    /// Character that may neither precede nor follow the opening delimiter,
    /// nor follow the closing one. Keeps `*` from matching inside `**`.
    exclusive: Option<char>,
    /// Spans emitted around the content, outermost first: kind plus the
    /// markdown of the opening and closing halves.
    wrap: &'static [(SpanKind, &'static str, &'static str)],
}

const BOLD_ITALIC_STARS: &[(SpanKind, &str, &str)] =
    &[(SpanKind::Bold, "**", "**"), (SpanKind::Italic, "*", "*")];
const BOLD_ITALIC_UNDERSCORES: &[(SpanKind, &str, &str)] =
    &[(SpanKind::Bold, "__", "__"), (SpanKind::Italic, "_", "_")];
const BOLD_STARS_ITALIC_UNDERSCORE: &[(SpanKind, &str, &str)] =
    &[(SpanKind::Bold, "**", "**"), (SpanKind::Italic, "_", "_")];
const BOLD_UNDERSCORES_ITALIC_STAR: &[(SpanKind, &str, &str)] =
    &[(SpanKind::Bold, "__", "__"), (SpanKind::Italic, "*", "*")];

const DELIMITED_RULES: &[Delimited] = &[
    Delimited {
        open: "***",
        close: "***",
        exclusive: None,
        wrap: BOLD_ITALIC_STARS,
    },
    Delimited {
        open: "___",
        close: "___",
        exclusive: None,
        wrap: BOLD_ITALIC_UNDERSCORES,
    },
    Delimited {
        open: "**_",
        close: "_**",
        exclusive: None,
        wrap: BOLD_STARS_ITALIC_UNDERSCORE,
    },
    Delimited {
        open: "__*",
        close: "*__",
        exclusive: None,
        wrap: BOLD_UNDERSCORES_ITALIC_STAR,
    },
    Delimited {
        open: "**",
        close: "**",
        exclusive: None,
        wrap: &[(SpanKind::Bold, "**", "**")],
    },
    Delimited {
        open: "__",
        close: "__",
        exclusive: Some('_'),
        wrap: &[(SpanKind::Bold, "__", "__")],
    },
    Delimited {
        open: "*",
        close: "*",
        exclusive: Some('*'),
        wrap: &[(SpanKind::Italic, "*", "*")],
    },
    Delimited {
        open: "_",
        close: "_",
        exclusive: Some('_'),
        wrap: &[(SpanKind::Italic, "_", "_")],
    },
    Delimited {
        open: "~~",
        close: "~~",
        exclusive: None,
        wrap: &[(SpanKind::Strikethrough, "~~", "~~")],
    },
    Delimited {
        open: "||",
        close: "||",
        exclusive: None,
        wrap: &[(SpanKind::Spoiler, "||", "||")],
    },
];

impl Delimited {
    /// Earliest valid closing delimiter at or after each position.
    fn closers(&self, tokens: &[Token]) -> Vec<usize> {
        let len = tokens.len();
        let mut next = vec![len; len + 1];
        for idx in (0..len).rev() {
            next[idx] = if self.closes_at(tokens, idx) {
                idx
            } else {
                next[idx + 1]
            };
        }
        next
    }

    fn closes_at(&self, tokens: &[Token], at: usize) -> bool {
        let after = at + self.close.len();
        matches_at(tokens, at, self.close)
            && !self
                .exclusive
                .is_some_and(|exclusive| is_char_at(tokens, after, exclusive))
    }

    /// Match at `start` with the shortest non-empty content.
    fn apply(
        &self,
        tokens: &[Token],
        start: usize,
        closers: &[usize],
    ) -> Option<(usize, Vec<Token>)> {
        if !matches_at(tokens, start, self.open) {
            return None;
        }
        let content_start = start + self.open.len();
        if let Some(exclusive) = self.exclusive {
            let preceded = start > 0 && is_char(&tokens[start - 1], exclusive);
            if preceded || is_char_at(tokens, content_start, exclusive) {
                return None;
            }
        }

        let end = lookup(closers, content_start + 1)?;
        Some((
            end + self.close.len(),
            self.wrap_content(&tokens[content_start..end]),
        ))
    }

    fn wrap_content(&self, content: &[Token]) -> Vec<Token> {
        let mut output = Vec::with_capacity(content.len() + 2 * self.wrap.len());
        for &(kind, open, _) in self.wrap {
            output.push(Token::Open(kind, open));
        }
        output.extend_from_slice(content);
        for &(kind, _, close) in self.wrap.iter().rev() {
            output.push(Token::Close(kind, close));
        }
        output
    }
}

/// `>`, `>>`, `> > ` prefixes collapse to one quote; the dialect has one level.
fn blockquote(tokens: TokenLine) -> TokenLine {
    let mut content_start = 0;
    while is_char_at(&tokens, content_start, '>') {
        content_start += 1;
        if tokens.get(content_start).is_some_and(is_space) {
            content_start += 1;
        }
    }
    if content_start == 0 {
        return tokens;
    }

    let mut output = Vec::with_capacity(tokens.len() - content_start + 1);
    output.push(Token::Quote);
    output.extend_from_slice(&tokens[content_start..]);
    output
}

/// `12. item` keeps the number; the period is structural and pre-escaped.
fn ordered_list(tokens: TokenLine) -> TokenLine {
    let digits = tokens
        .iter()
        .take_while(|token| matches!(token, Token::Char(c) if c.is_ascii_digit()))
        .count();
    if digits == 0 || !is_char_at(&tokens, digits, '.') {
        return tokens;
    }
    let spaces = tokens[digits + 1..].iter().take_while(|t| is_space(t)).count();
    if spaces == 0 {
        return tokens;
    }

    let mut output = Vec::with_capacity(tokens.len());
    output.extend_from_slice(&tokens[..digits]);
    output.push(Token::Escaped('.'));
    output.push(Token::Char(' '));
    output.extend_from_slice(&tokens[digits + 1 + spaces..]);
    output
}

fn bullet_list(tokens: TokenLine) -> TokenLine {
    if !matches!(tokens.first(), Some(Token::Char('-' | '*'))) {
        return tokens;
    }
    let spaces = tokens[1..].iter().take_while(|t| is_space(t)).count();
    if spaces == 0 {
        return tokens;
    }

    let mut output = Vec::with_capacity(tokens.len());
    output.push(Token::Char('•'));
    output.push(Token::Char(' '));
    output.extend_from_slice(&tokens[1 + spaces..]);
    output
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn line(text: &str) -> TokenLine {
        let mut lines = normalize(text);
        assert_eq!(lines.len(), 1, "expected a single line");
        lines.remove(0)
    }

    fn chars(text: &str) -> Vec<Token> {
        text.chars().map(Token::Char).collect()
    }

    fn wrapped(kind: SpanKind, open: &'static str, close: &'static str, text: &str) -> Vec<Token> {
        let mut tokens = vec![Token::Open(kind, open)];
        tokens.extend(chars(text));
        tokens.push(Token::Close(kind, close));
        tokens
    }

    #[test]
    fn test_plain_line_is_chars() {
        assert_eq!(line("just text."), chars("just text."));
    }

    #[test]
    fn test_lines_are_independent() {
        let lines = normalize("**a\nb**");
        assert_eq!(lines, vec![chars("**a"), chars("b**")]);
    }

    #[test]
    fn test_escaped_reserved_char() {
        assert_eq!(
            line(r"\*x\*"),
            vec![Token::Escaped('*'), Token::Char('x'), Token::Escaped('*')]
        );
    }

    #[test]
    fn test_backslash_before_plain_char_is_literal() {
        assert_eq!(line(r"\d"), chars(r"\d"));
    }

    #[test]
    fn test_escaped_backslash() {
        assert_eq!(
            line(r"\\*"),
            vec![Token::Escaped('\\'), Token::Char('*')]
        );
    }

    #[test]
    fn test_heading_becomes_bold() {
        assert_eq!(line("## Title"), wrapped(SpanKind::Bold, "", "", "Title"));
    }

    #[test]
    fn test_heading_requires_space() {
        assert_eq!(line("#hashtag"), chars("#hashtag"));
    }

    #[test]
    fn test_seven_hashes_is_not_heading() {
        assert_eq!(line("####### x"), chars("####### x"));
    }

    #[test]
    fn test_thematic_breaks() {
        assert_eq!(line("---"), vec![Token::Rule]);
        assert_eq!(line("*****"), vec![Token::Rule]);
        assert_eq!(line("___"), vec![Token::Rule]);
        assert_eq!(line("--"), chars("--"));
    }

    #[test]
    fn test_image_keeps_alt_text() {
        assert_eq!(line("![logo](https://x.io/logo.png)"), chars("logo"));
    }

    #[test]
    fn test_link() {
        let mut expected = vec![Token::LinkStart];
        expected.extend(chars("docs"));
        expected.push(Token::LinkEnd {
            url: "https://docs.rs".to_owned(),
            source: "](https://docs.rs)".to_owned(),
        });
        assert_eq!(line("[docs](https://docs.rs)"), expected);
    }

    #[test]
    fn test_link_with_balanced_parens() {
        let tokens = line("[Rust](https://en.wikipedia.org/wiki/Rust_(language))");
        assert_eq!(
            tokens.last(),
            Some(&Token::LinkEnd {
                url: "https://en.wikipedia.org/wiki/Rust_(language)".to_owned(),
                source: "](https://en.wikipedia.org/wiki/Rust_(language))".to_owned(),
            })
        );
    }

    #[test]
    fn test_link_with_unbalanced_paren_closes_at_first_paren() {
        let tokens = line("[a](https://x.io/(b)");
        assert_eq!(
            tokens.last(),
            Some(&Token::LinkEnd {
                url: "https://x.io/(b".to_owned(),
                source: "](https://x.io/(b)".to_owned(),
            })
        );
    }

    #[test]
    fn test_link_title_is_dropped() {
        let tokens = line(r#"[a](https://x.io "Title")"#);
        assert_eq!(
            tokens.last(),
            Some(&Token::LinkEnd {
                url: "https://x.io".to_owned(),
                source: r#"](https://x.io "Title")"#.to_owned(),
            })
        );
    }

    #[test]
    fn test_link_target_with_space_is_not_link() {
        assert_eq!(line("[a](b c)"), chars("[a](b c)"));
    }

    #[test]
    fn test_empty_link_parts_are_not_links() {
        assert_eq!(line("[](x)"), chars("[](x)"));
        assert_eq!(line("[x]()"), chars("[x]()"));
    }

    #[test]
    fn test_link_url_is_hidden_from_span_rules() {
        let tokens = line("[a](https://x.io/snake_case_path)");
        assert!(!tokens.iter().any(|t| matches!(t, Token::Open(..))));
    }

    #[test]
    fn test_bold_italic_forms() {
        let expected = |open_bold, open_italic| {
            let mut tokens = vec![
                Token::Open(SpanKind::Bold, open_bold),
                Token::Open(SpanKind::Italic, open_italic),
            ];
            tokens.extend(chars("x"));
            tokens.push(Token::Close(SpanKind::Italic, open_italic));
            tokens.push(Token::Close(SpanKind::Bold, open_bold));
            tokens
        };
        assert_eq!(line("***x***"), expected("**", "*"));
        assert_eq!(line("___x___"), expected("__", "_"));
        assert_eq!(line("**_x_**"), expected("**", "_"));
        assert_eq!(line("__*x*__"), expected("__", "*"));
    }

    #[test]
    fn test_bold() {
        assert_eq!(line("**b**"), wrapped(SpanKind::Bold, "**", "**", "b"));
        assert_eq!(line("__b__"), wrapped(SpanKind::Bold, "__", "__", "b"));
    }

    #[test]
    fn test_italic() {
        assert_eq!(line("*i*"), wrapped(SpanKind::Italic, "*", "*", "i"));
        assert_eq!(line("_i_"), wrapped(SpanKind::Italic, "_", "_", "i"));
    }

    #[test]
    fn test_italic_inside_bold() {
        let mut expected = vec![Token::Open(SpanKind::Bold, "**")];
        expected.extend(chars("a "));
        expected.extend(wrapped(SpanKind::Italic, "*", "*", "b"));
        expected.extend(chars(" c"));
        expected.push(Token::Close(SpanKind::Bold, "**"));
        assert_eq!(line("**a *b* c**"), expected);
    }

    #[test]
    fn test_strikethrough_and_spoiler() {
        assert_eq!(
            line("~~s~~"),
            wrapped(SpanKind::Strikethrough, "~~", "~~", "s")
        );
        assert_eq!(line("||s||"), wrapped(SpanKind::Spoiler, "||", "||", "s"));
    }

    #[test]
    fn test_mismatched_markers_stay_literal() {
        assert_eq!(line("*text_"), chars("*text_"));
    }

    #[test]
    fn test_lone_star_is_literal() {
        assert_eq!(line("5 * 3 = 15"), chars("5 * 3 = 15"));
    }

    #[test]
    fn test_escaped_marker_does_not_delimit() {
        assert_eq!(
            line(r"*a\*"),
            vec![Token::Char('*'), Token::Char('a'), Token::Escaped('*')]
        );
    }

    #[test]
    fn test_blockquote() {
        let mut expected = vec![Token::Quote];
        expected.extend(chars("quoted"));
        assert_eq!(line("> quoted"), expected);
        assert_eq!(line(">>quoted"), expected);
        assert_eq!(line("> > quoted"), expected);
    }

    #[test]
    fn test_ordered_list() {
        let mut expected = chars("12");
        expected.push(Token::Escaped('.'));
        expected.extend(chars(" item"));
        assert_eq!(line("12.   item"), expected);
    }

    #[test]
    fn test_ordered_list_requires_space() {
        assert_eq!(line("3.14"), chars("3.14"));
    }

    #[test]
    fn test_bullets() {
        assert_eq!(line("- item"), chars("• item"));
        assert_eq!(line("* item"), chars("• item"));
        assert_eq!(line("-item"), chars("-item"));
    }

    #[test]
    fn test_push_literal_restores_markdown() {
        let mut out = String::new();
        for token in line("**a** [b](c)") {
            token.push_literal(&mut out);
        }
        assert_eq!(out, "**a** [b](c)");
    }

    #[test]
    fn test_crlf_lines_keep_line_rules() {
        assert_eq!(line("---\r"), vec![Token::Rule, Token::Char('\r')]);

        let mut expected = wrapped(SpanKind::Bold, "", "", "Title");
        expected.push(Token::Char('\r'));
        assert_eq!(line("# Title\r"), expected);
    }

    #[test]
    fn test_several_links_on_one_line() {
        let tokens = line("[a](https://a.io) and [b](https://b.io/(x)) and [c](bad target)");
        let urls: Vec<&str> = tokens
            .iter()
            .filter_map(|token| match token {
                Token::LinkEnd { url, .. } => Some(url.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(urls, vec!["https://a.io", "https://b.io/(x)"]);
    }

    #[test]
    fn test_long_unbalanced_lines_stay_literal() {
        let brackets = "[".repeat(50_000);
        assert_eq!(line(&brackets), chars(&brackets));

        let targets = "[a](x".repeat(10_000);
        assert_eq!(line(&targets), chars(&targets));

        // `**_` never closes; the plain `**` pairs still match
        let openers = "**_a ".repeat(10_000);
        let mut literal = String::new();
        for token in line(&openers) {
            token.push_literal(&mut literal);
        }
        assert_eq!(literal, openers);
    }
}
