//! PassRecord - the immutable record of one improvement pass
//!
//! Stored line-by-line in JSONL transcripts for auditability.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::utc_now_iso;

/// Which protocol step a record captures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Draft,
    Critique,
    #[default]
    Revision,
    Finalize,
}

/// A single improvement pass
///
/// Captures everything one draft -> critique -> revise cycle produced:
/// the candidate text before and after critique, the critique itself, a
/// unified diff of what changed, and accounting data. Immutable once
/// appended to a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassRecord {
    /// 1-based index of the pass within its run
    pub step: u32,

    /// Protocol step this record captures
    pub phase: RunPhase,

    /// Plan outline the pass worked from (V2 only)
    pub plan: Option<String>,

    /// Candidate text before critique
    pub draft: String,

    /// Feedback text from the critic
    pub critique: Option<String>,

    /// Candidate text after applying the critique
    pub revision: String,

    /// Unified diff between draft and revision; empty means no change
    #[serde(default)]
    pub diff: String,

    /// Cumulative rough token count at the time the pass was recorded
    #[serde(default)]
    pub token_estimate: usize,

    /// Wall time for the pass in milliseconds
    pub elapsed_ms: Option<u64>,

    /// Creation timestamp (ISO-8601 UTC)
    pub created_at: String,

    /// Lightweight metadata bag
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl PassRecord {
    /// Create a new record; draft and revision are whitespace-trimmed
    pub fn new(step: u32, draft: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            step,
            phase: RunPhase::Revision,
            plan: None,
            draft: draft.into().trim().to_string(),
            critique: None,
            revision: revision.into().trim().to_string(),
            diff: String::new(),
            token_estimate: 0,
            elapsed_ms: None,
            created_at: utc_now_iso(),
            meta: HashMap::new(),
        }
    }

    /// Builder: set the plan outline
    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    /// Builder: set the critique text
    pub fn with_critique(mut self, critique: impl Into<String>) -> Self {
        self.critique = Some(critique.into());
        self
    }

    /// Builder: set the draft/revision diff
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = diff.into();
        self
    }

    /// Builder: set the cumulative token estimate
    pub fn with_token_estimate(mut self, tokens: usize) -> Self {
        self.token_estimate = tokens;
        self
    }

    /// Builder: set the elapsed wall time
    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = Some(elapsed_ms);
        self
    }

    /// Builder: add a metadata entry
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Check whether the revision actually changed anything
    pub fn is_unchanged(&self) -> bool {
        self.diff.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_draft_and_revision() {
        let record = PassRecord::new(1, "  draft text\n", "\trevision text  ");
        assert_eq!(record.draft, "draft text");
        assert_eq!(record.revision, "revision text");
        assert_eq!(record.step, 1);
        assert_eq!(record.phase, RunPhase::Revision);
        assert!(record.plan.is_none());
        assert!(record.critique.is_none());
    }

    #[test]
    fn test_builder_chain() {
        let record = PassRecord::new(2, "d", "r")
            .with_plan("- step one\n- step two")
            .with_critique("**Overall**: 0.8")
            .with_diff("--- a\n+++ b\n")
            .with_token_estimate(120)
            .with_elapsed_ms(45)
            .with_meta("mode", "v2");

        assert_eq!(record.plan.as_deref(), Some("- step one\n- step two"));
        assert_eq!(record.critique.as_deref(), Some("**Overall**: 0.8"));
        assert_eq!(record.token_estimate, 120);
        assert_eq!(record.elapsed_ms, Some(45));
        assert_eq!(record.meta.get("mode").map(String::as_str), Some("v2"));
        assert!(!record.is_unchanged());
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let record = PassRecord::new(1, "d", "r");
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"phase\":\"revision\""));
    }

    #[test]
    fn test_serde_round_trip() {
        let record = PassRecord::new(3, "draft", "revision")
            .with_critique("looks fine")
            .with_meta("mode", "v1");

        let json = serde_json::to_string(&record).unwrap();
        let back: PassRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back.step, 3);
        assert_eq!(back.draft, "draft");
        assert_eq!(back.revision, "revision");
        assert_eq!(back.critique.as_deref(), Some("looks fine"));
        assert_eq!(back.created_at, record.created_at);
        assert_eq!(back.meta.get("mode").map(String::as_str), Some("v1"));
    }

    #[test]
    fn test_is_unchanged_on_empty_diff() {
        let record = PassRecord::new(1, "same", "same");
        assert!(record.is_unchanged());
    }
}
