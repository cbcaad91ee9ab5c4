//! Token-ish estimation and conversation budgeting
//!
//! Rough, dependency-free text sizing used for prompt caps and truncation
//! decisions. This is glue, not a tokenizer: one token is approximated as
//! four characters of prose, which overestimates short text and slightly
//! underestimates long text. Good enough for pass caps.

use crate::llm::{Role, Turn};

/// Approximate characters per token for English prose
pub const AVG_CHARS_PER_TOKEN: usize = 4;

/// Appended to any text that was hard-cut to fit a budget
pub const TRUNCATION_MARKER: &str = " …[truncated]";

const MIN_TOKENS: usize = 1;

/// Rough token estimate for a single string
///
/// 0 for empty text, otherwise `ceil(chars / 4)` floored at 1.
pub fn estimate(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    MIN_TOKENS.max(text.chars().count().div_ceil(AVG_CHARS_PER_TOKEN))
}

/// Sum rough token estimates over a conversation
///
/// Content only; roles are not counted.
pub fn estimate_conversation(turns: &[Turn]) -> usize {
    turns.iter().map(|t| estimate(&t.content)).sum()
}

/// Truncate a single string to approximately fit a token budget
///
/// Quick return if already within budget, otherwise a hard cut by
/// characters using the same heuristic, with the truncation marker
/// appended. Returns the text and its new estimate.
pub fn fit_to_budget(text: &str, budget: usize) -> (String, usize) {
    if budget == 0 {
        return (String::new(), 0);
    }

    let current = estimate(text);
    if current <= budget {
        return (text.to_string(), current);
    }

    let char_budget = budget * AVG_CHARS_PER_TOKEN;
    let mut truncated: String = text.chars().take(char_budget).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push_str(TRUNCATION_MARKER);
    let tokens = estimate(&truncated);
    (truncated, tokens)
}

/// Truncate a conversation to roughly fit a token budget
///
/// Policy, applied in order:
/// 1. optionally pin the first system turn untouched;
/// 2. drop the oldest non-pinned turn while over budget, but never the
///    final turn;
/// 3. if still over budget, truncate contents from the oldest remaining
///    turn forward, recomputing the residual budget each time;
/// 4. as a last resort, truncate the newest turn.
///
/// Oldest context is considered least valuable. The policy is
/// deterministic and is relied on by tests.
pub fn fit_conversation(turns: &[Turn], budget: usize, preserve_first_system: bool) -> Vec<Turn> {
    if budget == 0 || turns.is_empty() {
        return Vec::new();
    }

    let mut pinned: Vec<Turn> = Vec::new();
    let mut rest: Vec<Turn> = turns.to_vec();
    if preserve_first_system && rest[0].role == Role::System {
        pinned.push(rest.remove(0));
    }

    fn total(pinned: &[Turn], rest: &[Turn]) -> usize {
        estimate_conversation(pinned) + estimate_conversation(rest)
    }

    // Drop oldest non-pinned until within budget, keeping the last turn
    while rest.len() > 1 && total(&pinned, &rest) > budget {
        rest.remove(0);
    }

    // Still over: truncate from the oldest remaining turn forward
    let mut i = 0;
    while i < rest.len() && total(&pinned, &rest) > budget {
        let others: usize = estimate_conversation(&pinned)
            + rest
                .iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .map(|(_, t)| estimate(&t.content))
                .sum::<usize>();
        let residual = budget.saturating_sub(others).max(1);
        let (content, _) = fit_to_budget(&rest[i].content, residual);
        rest[i].content = content;
        i += 1;
    }

    // Final safety: truncate the newest turn
    if !rest.is_empty() && total(&pinned, &rest) > budget {
        let j = rest.len() - 1;
        let others = estimate_conversation(&pinned) + estimate_conversation(&rest[..j]);
        let residual = budget.saturating_sub(others).max(1);
        let (content, _) = fit_to_budget(&rest[j].content, residual);
        rest[j].content = content;
    }

    pinned.into_iter().chain(rest).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_empty() {
        assert_eq!(estimate(""), 0);
    }

    #[test]
    fn test_estimate_matches_ceiling_of_quarter_length() {
        assert_eq!(estimate("hello world"), 3); // 11 chars
        assert_eq!(estimate("abcd"), 1);
        assert_eq!(estimate("abcde"), 2);
        assert_eq!(estimate("a"), 1);
    }

    #[test]
    fn test_estimate_floors_at_one_for_nonempty() {
        assert_eq!(estimate("x"), 1);
        assert_eq!(estimate("xy"), 1);
    }

    #[test]
    fn test_estimate_conversation_ignores_roles() {
        let turns = vec![Turn::system("abcd"), Turn::user("abcdefgh")];
        assert_eq!(estimate_conversation(&turns), 3);
        assert_eq!(estimate_conversation(&[]), 0);
    }

    #[test]
    fn test_fit_to_budget_zero_returns_empty() {
        assert_eq!(fit_to_budget("anything at all", 0), (String::new(), 0));
    }

    #[test]
    fn test_fit_to_budget_within_budget_unchanged() {
        let (text, tokens) = fit_to_budget("short", 100);
        assert_eq!(text, "short");
        assert_eq!(tokens, 2);
    }

    #[test]
    fn test_fit_to_budget_truncates_and_marks() {
        let long = "word ".repeat(100);
        let (text, tokens) = fit_to_budget(&long, 5);
        assert!(text.ends_with(TRUNCATION_MARKER));
        assert!(text.chars().count() < long.chars().count());
        assert!(tokens >= 1);
    }

    #[test]
    fn test_fit_to_budget_cut_is_char_boundary_safe() {
        let long = "héllo wörld ".repeat(50);
        let (text, _) = fit_to_budget(&long, 3);
        assert!(text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_fit_conversation_zero_budget_empty() {
        let turns = vec![Turn::system("sys"), Turn::user("hello")];
        assert!(fit_conversation(&turns, 0, true).is_empty());
    }

    #[test]
    fn test_fit_conversation_large_budget_unchanged() {
        let turns = vec![Turn::system("sys"), Turn::user("hello"), Turn::assistant("hi")];
        let fitted = fit_conversation(&turns, 10_000, true);
        assert_eq!(fitted, turns);
    }

    #[test]
    fn test_fit_conversation_drops_oldest_first() {
        let turns = vec![
            Turn::system("pinned system prompt"),
            Turn::user(&"old ".repeat(50)),
            Turn::assistant(&"middle ".repeat(50)),
            Turn::user("newest question"),
        ];
        let fitted = fit_conversation(&turns, 30, true);

        // Pinned system survives untouched, newest turn survives
        assert_eq!(fitted[0].role, Role::System);
        assert_eq!(fitted[0].content, "pinned system prompt");
        assert_eq!(fitted.last().unwrap().role, Role::User);
        assert!(fitted.len() < turns.len());
    }

    #[test]
    fn test_fit_conversation_never_drops_final_turn() {
        let turns = vec![
            Turn::system("sys"),
            Turn::user(&"a".repeat(4000)), // far over any small budget
        ];
        let fitted = fit_conversation(&turns, 5, true);
        assert!(!fitted.is_empty());
        assert_eq!(fitted[0].content, "sys");
        assert_eq!(fitted.len(), 2);
        // The final turn got truncated instead of dropped
        assert!(fitted[1].content.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn test_fit_conversation_without_system_pinning() {
        let turns = vec![Turn::system(&"s".repeat(400)), Turn::user("hi")];
        let fitted = fit_conversation(&turns, 10, false);
        // Unpinned system turn is droppable like any other
        assert_eq!(fitted.len(), 1);
        assert_eq!(fitted[0].content, "hi");
    }

    #[test]
    fn test_fit_conversation_result_is_within_reach_of_budget() {
        let turns = vec![
            Turn::system("keep me"),
            Turn::user(&"x".repeat(1000)),
            Turn::user(&"y".repeat(1000)),
        ];
        let fitted = fit_conversation(&turns, 20, true);
        // Everything after the pin fits in the residual (marker overshoot aside)
        let total = estimate_conversation(&fitted);
        assert!(total <= 20 + estimate(TRUNCATION_MARKER));
    }
}
