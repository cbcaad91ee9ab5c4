//! Human-readable diffs between text versions
//!
//! Used to record what a revision actually changed relative to its draft
//! in the persisted transcript.

use similar::TextDiff;

/// Produce a small unified diff between two strings
///
/// Returns the empty string when the inputs are identical - the
/// transcript's sentinel for "no change". Otherwise a unified diff over
/// lines with two lines of context, labelled `a` / `b`.
pub fn diff_text(a: &str, b: &str) -> String {
    if a == b {
        return String::new();
    }

    let diff = TextDiff::from_lines(a, b);
    let mut out = String::from("--- a\n+++ b\n");
    for hunk in diff.unified_diff().context_radius(2).iter_hunks() {
        out.push_str(&hunk.to_string());
    }
    out
}
