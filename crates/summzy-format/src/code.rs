//! Code region extraction and restoration.
//!
//! Code is the one place where the dialect's escaping rules must not apply.
//! Fenced blocks and inline code spans are swapped for opaque placeholders
//! before any markdown rewriting happens, and put back verbatim once the
//! surrounding text has been rendered.
//!
//! Placeholders look like `\0CB3\0` (fenced) or `\0IC4\0` (inline). They
//! contain no reserved dialect character, so they survive escaping and span
//! parsing untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::replacements::Replacements;

/// Opening fence, optional language tag, body up to the next fence.
static FENCED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```([A-Za-z0-9_]*)\n?(.*?)```").unwrap());

/// Single-backtick span that stays on one line.
static INLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`\n]+?)`").unwrap());

const PLACEHOLDER_DELIMITER: char = '\0';

/// Code regions removed from a text, keyed by their placeholder.
///
/// Created fresh by every [`extract`] call and consumed by [`restore`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeRegions {
    entries: Vec<(String, String)>,
}

impl CodeRegions {
    /// Number of extracted regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no region was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dialect rendering of the region behind `placeholder`.
    #[must_use]
    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == placeholder)
            .map(|(_, code)| code.as_str())
    }

    /// Iterate over `(placeholder, code)` pairs in extraction order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, code)| (key.as_str(), code.as_str()))
    }

    fn push(&mut self, kind: &str, code: String) -> String {
        let placeholder = format!(
            "{PLACEHOLDER_DELIMITER}{kind}{}{PLACEHOLDER_DELIMITER}",
            self.entries.len()
        );
        self.entries.push((placeholder.clone(), code));
        placeholder
    }
}

/// Replace fenced and inline code with placeholders.
///
/// Fenced blocks are normalized to `` ```lang\nbody\n``` `` with trailing
/// whitespace trimmed from the body; inline code keeps its exact body.
/// Fences are matched first, non-greedily, so the first closing fence wins.
///
/// # Example
///
/// ```
/// use summzy_format::code;
///
/// let (text, regions) = code::extract("run `ls -la` now");
/// assert_eq!(text, "run \0IC0\0 now");
/// assert_eq!(regions.get("\0IC0\0"), Some("`ls -la`"));
/// ```
pub fn extract(text: &str) -> (String, CodeRegions) {
    let mut regions = CodeRegions::default();

    let without_fences = FENCED_RE.replace_all(text, |caps: &Captures<'_>| {
        let lang = &caps[1];
        let body = caps[2].trim_end();
        regions.push("CB", format!("```{lang}\n{body}\n```"))
    });

    let without_code = INLINE_RE.replace_all(&without_fences, |caps: &Captures<'_>| {
        regions.push("IC", format!("`{}`", &caps[1]))
    });

    let stripped = without_code.into_owned();
    (stripped, regions)
}

/// Substitute placeholders back with their code.
///
/// # Example
///
/// ```
/// use summzy_format::code;
///
/// let (text, regions) = code::extract("```sh\necho $HOME\n```");
/// assert_eq!(code::restore(&text, &regions), "```sh\necho $HOME\n```");
/// ```
#[must_use]
pub fn restore(text: &str, regions: &CodeRegions) -> String {
    let mut output = text.to_owned();
    if regions.is_empty() {
        return output;
    }

    let mut replacements = Replacements::with_capacity(regions.len());
    for (placeholder, code) in regions.iter() {
        replacements.add(placeholder, code);
    }
    replacements.apply(&mut output);
    output
}
