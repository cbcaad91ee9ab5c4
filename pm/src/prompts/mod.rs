//! Prompt templates and loading
//!
//! Prompt content is process-wide and immutable: compiled-in defaults
//! with an optional per-project file override, never mutated after load.

pub mod embedded;
mod loader;

pub use loader::{CriticContext, DraftContext, PlanContext, PromptLoader, RevisionContext};
