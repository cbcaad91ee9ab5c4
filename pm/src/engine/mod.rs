//! Pass orchestration engines
//!
//! Two engines share one protocol vocabulary: a budgeted system+user
//! prompt for drafting, a stable critic conversation, and a revision
//! conversation that replays the draft as prior assistant output. The
//! engines sequence those steps and decide when to stop; everything
//! below them is stateless plumbing.

pub mod score;
mod v1;
mod v2;

pub use v1::PromptModeV1;
pub use v2::PromptModeV2;

use eyre::Result;

use crate::budget::fit_conversation;
use crate::llm::Turn;
use crate::prompts::{CriticContext, PromptLoader, RevisionContext};
use crate::sanitize::sanitize;

/// Generous fixed budget for the critic conversation; the output side is
/// clamped by `CRITIC_MAX_TOKENS`
pub(crate) const CRITIC_BUDGET: usize = 2000;

/// Output cap for critic calls - critiques are short by design
pub(crate) const CRITIC_MAX_TOKENS: usize = 256;

/// Fixed budget for the revision conversation
pub(crate) const REVISION_BUDGET: usize = 2000;

/// Output cap for the planning call
pub(crate) const PLAN_MAX_TOKENS: usize = 200;

/// Temperature for the planning call - plans should be near-stable
pub(crate) const PLAN_TEMPERATURE: f64 = 0.1;

/// Build a sanitized system+user conversation fitted to a budget
pub(crate) fn budgeted_prompt(system_prompt: &str, user_text: &str, max_tokens: usize) -> Vec<Turn> {
    let turns = vec![Turn::system(sanitize(system_prompt)), Turn::user(sanitize(user_text))];
    fit_conversation(&turns, max_tokens, true)
}

/// Build the critic conversation for a candidate answer
///
/// The critic always runs at temperature 0 so its scores are stable
/// across identical inputs.
pub(crate) fn critic_conversation(loader: &PromptLoader, task_text: &str, candidate: &str) -> Result<Vec<Turn>> {
    let system = format!(
        "{}\n\nYou will receive the user's request and a CANDIDATE answer.",
        loader.raw("critic-guidelines")?
    );
    let user = loader.render(
        "critic-user",
        &CriticContext {
            task: sanitize(task_text),
            candidate: sanitize(candidate),
        },
    )?;

    Ok(fit_conversation(&[Turn::system(system), Turn::user(user)], CRITIC_BUDGET, true))
}

/// Build the revision conversation
///
/// The draft is replayed as prior assistant content and the critique
/// arrives as the newest user turn, so the model revises rather than
/// answers from scratch.
pub(crate) fn revision_conversation(
    loader: &PromptLoader,
    system_prompt: &str,
    task_text: &str,
    draft: &str,
    critique: &str,
) -> Result<Vec<Turn>> {
    let system = format!(
        "{}\n\nRevise the answer by APPLYING the feedback below.\nRespond with ONLY the revised answer.",
        system_prompt
    );
    let context = RevisionContext {
        task: sanitize(task_text),
        draft: sanitize(draft),
        critique: sanitize(critique),
    };

    let turns = vec![
        Turn::system(system),
        Turn::user(loader.render("revision-task", &context)?),
        Turn::assistant(loader.render("revision-draft", &context)?),
        Turn::user(loader.render("revision-critique", &context)?),
    ];

    Ok(fit_conversation(&turns, REVISION_BUDGET, true))
}
