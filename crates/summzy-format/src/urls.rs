//! URL detection in free text.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)https?://[^\s<>"']+"#).unwrap());

/// Punctuation that usually belongs to the surrounding sentence.
const TRAILING_PUNCTUATION: &[char] = &[')', ',', '.', ';', '!', '?'];

/// Find distinct `http(s)` URLs in order of first appearance.
///
/// # Example
///
/// ```
/// use summzy_format::extract_urls;
///
/// let urls = extract_urls("Read https://blog.rust-lang.org/. Also (https://docs.rs)!");
/// assert_eq!(urls, vec!["https://blog.rust-lang.org/", "https://docs.rs"]);
/// ```
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for found in URL_RE.find_iter(text) {
        let candidate = found.as_str().trim_end_matches(TRAILING_PUNCTUATION);
        if is_http_url(candidate) && !urls.iter().any(|url| url == candidate) {
            urls.push(candidate.to_owned());
        }
    }
    urls
}

/// First URL in `text`, if any.
pub fn extract_first_url(text: &str) -> Option<String> {
    extract_urls(text).into_iter().next()
}

fn is_http_url(candidate: &str) -> bool {
    url::Url::parse(candidate).is_ok_and(|parsed| {
        matches!(parsed.scheme(), "http" | "https")
            && parsed.host_str().is_some_and(|host| !host.is_empty())
    })
}
