//! Text sanitization for conversation content
//!
//! Minimal normalization to prevent common prompt/render breakage before
//! text enters a conversation. Intentionally conservative: the goal is to
//! avoid altering meaning.

use regex::Regex;
use std::sync::LazyLock;

static NONPRINTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f]").expect("valid regex"));
static MULTISPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]{2,}").expect("valid regex"));
static MULTINEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));
static FENCE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`{4,}").expect("valid regex"));

/// Normalize doubly-escaped HTML entities back to literal characters
///
/// Single replacement pass per entity; `&amp;` goes last so that
/// `&amp;lt;` collapses by exactly one level, like a single unescape.
fn unescape_entities(text: &str) -> String {
    const ENTITIES: [(&str, &str); 7] = [
        ("&lt;", "<"),
        ("&gt;", ">"),
        ("&quot;", "\""),
        ("&#x27;", "'"),
        ("&#39;", "'"),
        ("&nbsp;", " "),
        ("&amp;", "&"),
    ];

    let mut out = text.to_string();
    for (entity, literal) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, literal);
        }
    }
    out
}

/// Sanitize raw text before it enters a conversation
///
/// - strip control chars (except `\n` and `\t`)
/// - collapse runs of spaces/tabs to two spaces, and 3+ newlines to two
/// - normalize escaped HTML entities the model might emit
/// - cap runaway backtick runs at three (malformed code fences)
/// - trim surrounding whitespace
pub fn sanitize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let t = NONPRINTABLE.replace_all(text, "");
    let t = MULTISPACE.replace_all(&t, "  ");
    let t = MULTINEWLINE.replace_all(&t, "\n\n");
    let t = unescape_entities(&t);
    let t = FENCE_RUN.replace_all(&t, "```");

    t.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_output() {
        assert_eq!(sanitize(""), "");
    }

    #[test]
    fn test_strips_control_chars_keeps_newline_and_tab() {
        assert_eq!(sanitize("a\x00b\x07c"), "abc");
        assert_eq!(sanitize("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn test_collapses_horizontal_whitespace_to_two_spaces() {
        assert_eq!(sanitize("a     b"), "a  b");
        assert_eq!(sanitize("a\t\t\tb"), "a  b");
    }

    #[test]
    fn test_collapses_newline_runs_to_two() {
        assert_eq!(sanitize("a\n\n\n\n\nb"), "a\n\nb");
        assert_eq!(sanitize("a\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_unescapes_html_entities() {
        assert_eq!(sanitize("a &amp; b &lt;tag&gt;"), "a & b <tag>");
        assert_eq!(sanitize("say &quot;hi&quot;"), "say \"hi\"");
    }

    #[test]
    fn test_double_escaped_entity_collapses_one_level() {
        assert_eq!(sanitize("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_caps_backtick_runs_at_three() {
        assert_eq!(sanitize("``````python"), "```python");
        assert_eq!(sanitize("```ok```"), "```ok```");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(sanitize("  hello  \n"), "hello");
    }

    #[test]
    fn test_is_pure() {
        let input = "stable input";
        assert_eq!(sanitize(input), sanitize(input));
    }
}
