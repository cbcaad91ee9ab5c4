//! Critic score extraction
//!
//! The critic self-reports quality through a final `**Overall**: <score>`
//! line. Extraction is deliberately lenient - the critic is a language
//! model and the phrasing drifts - but values outside [0, 1] are
//! rejected rather than clamped.

use regex::Regex;
use std::sync::LazyLock;

static BOLD_OVERALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*Overall\*\*:\s*([01](?:\.\d+)?)").expect("valid regex"));
static PLAIN_OVERALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bOverall:\s*([01](?:\.\d+)?)").expect("valid regex"));

/// Extract an `**Overall**: 0.87` style score from critic output
///
/// Tolerates a plain `Overall:` without bold, case-insensitively.
/// Returns None when no parseable in-range score is found; callers
/// default the absent case to 0.0.
pub fn parse_overall_score(text: &str) -> Option<f64> {
    let captures = BOLD_OVERALL.captures(text).or_else(|| PLAIN_OVERALL.captures(text))?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;
    (0.0..=1.0).contains(&value).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_bold_form() {
        assert_eq!(parse_overall_score("**Overall**: 0.87"), Some(0.87));
        assert_eq!(parse_overall_score("scores above\n**Overall**: 1.0\ntrailing"), Some(1.0));
        assert_eq!(parse_overall_score("**Overall**: 0"), Some(0.0));
    }

    #[test]
    fn test_parses_plain_form() {
        assert_eq!(parse_overall_score("Overall: 0.5"), Some(0.5));
        assert_eq!(parse_overall_score("overall: 0.25"), Some(0.25));
        assert_eq!(parse_overall_score("OVERALL: 1"), Some(1.0));
    }

    #[test]
    fn test_bold_form_wins_over_plain() {
        let text = "Overall: 0.2\n**Overall**: 0.9";
        assert_eq!(parse_overall_score(text), Some(0.9));
    }

    #[test]
    fn test_absent_score_is_none() {
        assert_eq!(parse_overall_score("no score here"), None);
        assert_eq!(parse_overall_score(""), None);
        assert_eq!(parse_overall_score("Coverage: 0.8"), None);
    }

    #[test]
    fn test_out_of_range_rejected_not_clamped() {
        assert_eq!(parse_overall_score("**Overall**: 1.5"), None);
    }

    #[test]
    fn test_malformed_value_is_none() {
        assert_eq!(parse_overall_score("Overall: high"), None);
        assert_eq!(parse_overall_score("Overall: .9"), None);
    }
}
