//! Shared utility functions.

/// Length of `text` in UTF-16 code units, the unit Telegram uses for limits.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count as two.
///
/// # Examples
///
/// ```
/// use summzy_format::utf16_len;
///
/// assert_eq!(utf16_len("hello"), 5);
/// assert_eq!(utf16_len("héllo"), 5);
/// assert_eq!(utf16_len("hi 👋"), 5);
/// ```
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}
