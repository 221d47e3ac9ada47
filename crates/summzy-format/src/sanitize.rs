//! Cleanup of model output before it is shown to users.

use std::sync::LazyLock;

use regex::RegexSet;

/// Lines that echo the bot's own status messages back at the user.
static ECHOED_STATUS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"(?i)Fetching and summarizing the link\.\s*This may take a moment(?:\.{3}|…)?",
        r"(?i)Ask questions about this document.*/newchat.*reset\.?",
    ])
    .unwrap()
});

/// Drop lines that repeat bot status prompts and trim the result.
///
/// Blank lines are kept so paragraph structure survives; `\r\n` line endings
/// are normalized to `\n`.
///
/// # Example
///
/// ```
/// use summzy_format::sanitize_assistant_output;
///
/// let raw = "Fetching and summarizing the link. This may take a moment...\n\nSummary here.";
/// assert_eq!(sanitize_assistant_output(raw), "Summary here.");
/// ```
pub fn sanitize_assistant_output(text: &str) -> String {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| {
            let trimmed = line.trim();
            trimmed.is_empty() || !ECHOED_STATUS.is_match(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_clean_text_unchanged() {
        assert_eq!(sanitize_assistant_output("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_fetching_prompt_removed() {
        let raw = "Intro\nfetching and summarizing the link.   this may take a moment…\nOutro";
        assert_eq!(sanitize_assistant_output(raw), "Intro\nOutro");
    }

    #[test]
    fn test_followup_prompt_removed() {
        let raw = "Summary\n\nAsk questions about this document, or send /newchat to reset.";
        assert_eq!(sanitize_assistant_output(raw), "Summary");
    }

    #[test]
    fn test_crlf_normalized() {
        assert_eq!(sanitize_assistant_output("a\r\nb\r\n"), "a\nb");
    }

    #[test]
    fn test_only_prompts_yields_empty() {
        assert_eq!(
            sanitize_assistant_output("Fetching and summarizing the link. This may take a moment"),
            ""
        );
    }
}
