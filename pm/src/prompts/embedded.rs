//! Embedded fallback prompts
//!
//! These are compiled into the binary and used when template files are
//! not found. Keep them short and auditable.

// The answer-path system prompts deliberately avoid the critic persona's
// vocabulary: backends distinguish the critic role by its system content.

/// System prompt for the single-pass engine
pub const SYSTEM_V1: &str = r#"You are an LLM that performs a single self-review and revision.

Process:
1) Produce a concise DRAFT answer to the user's request.
2) Evaluate your draft against the request and constraints (clarity, coverage, constraints).
3) Produce a REVISED answer that applies the feedback. Keep it short and structured.

Output only the revised answer (no meta commentary)."#;

/// System prompt for the iterative engine
pub const SYSTEM_V2: &str = r#"You are an LLM that plans, iterates, and improves an answer in small passes.

Process:
- PLAN: outline 2-4 subgoals needed to answer well.
- For each pass: propose a short DRAFT, consider the FEEDBACK, then REVISE.
- Keep answers concise and structured. Avoid scope creep. Respect constraints.

A separate evaluation step will review each draft between passes."#;

/// Critic persona instructions
///
/// The closing line format is load-bearing: the early-stop check parses
/// the critic's self-reported Overall score from it.
pub const CRITIC_GUIDELINES: &str = r#"You are a CRITIC. Evaluate ONLY the candidate answer against the user's request.

Score with bullets in 3 dimensions (0.00-1.00):
- Coverage - does it answer the full ask?
- Clarity - is it concise and readable?
- Constraints - does it obey explicit constraints?

Then give 2-3 concrete improvement suggestions.
Finish with line: **Overall**: <score>"#;

/// Generic plan used when the planning call fails
pub const FALLBACK_PLAN: &str = "- Provide concise answer\n- Cover constraints\n- Include rationale\n";

/// User turn asking for the plan outline
pub const PLAN_USER: &str = "Plan the answer as 2-4 bullet subgoals.\n\nTask:\n{{task}}";

/// User turn for one iterative drafting pass
pub const DRAFT_USER: &str =
    "USER REQUEST:\n{{task}}\n\nPLAN:\n{{plan}}\n\nProvide a concise draft for pass {{step}}.";

/// User turn handing the critic its inputs
pub const CRITIC_USER: &str = "USER REQUEST:\n{{task}}\n\nCANDIDATE:\n{{candidate}}";

/// Revision conversation: the original request
pub const REVISION_TASK: &str = "USER REQUEST:\n{{task}}";

/// Revision conversation: the draft, replayed as prior assistant output
pub const REVISION_DRAFT: &str = "DRAFT:\n{{draft}}";

/// Revision conversation: the critique plus the revise instruction
pub const REVISION_CRITIQUE: &str = "CRITIQUE:\n{{critique}}\n\nPlease provide the REVISED answer now.";

/// Look up an embedded template by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    match name {
        "system-v1" => Some(SYSTEM_V1),
        "system-v2" => Some(SYSTEM_V2),
        "critic-guidelines" => Some(CRITIC_GUIDELINES),
        "fallback-plan" => Some(FALLBACK_PLAN),
        "plan-user" => Some(PLAN_USER),
        "draft-user" => Some(DRAFT_USER),
        "critic-user" => Some(CRITIC_USER),
        "revision-task" => Some(REVISION_TASK),
        "revision-draft" => Some(REVISION_DRAFT),
        "revision-critique" => Some(REVISION_CRITIQUE),
        _ => None,
    }
}
