//! Collected placeholder replacements.

/// Collects placeholder substitutions and applies them in one go.
///
/// Placeholders registered here are unique and never overlap, so the order
/// of application does not affect the result.
#[derive(Debug, Default)]
pub(crate) struct Replacements {
    items: Vec<(String, String)>,
}

impl Replacements {
    /// Create a new replacements collector with pre-allocated capacity.
    #[must_use]
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Register a replacement: all occurrences of `from` will be replaced with `to`.
    pub(crate) fn add(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.items.push((from.into(), to.into()));
    }

    /// Apply all registered replacements, consuming the collector.
    pub(crate) fn apply(self, text: &mut String) {
        for (from, to) in self.items {
            if text.contains(&from) {
                *text = text.replace(&from, &to);
            }
        }
    }
}
