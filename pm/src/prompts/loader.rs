//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults,
//! and renders them through Handlebars. Templates are immutable once
//! loaded; there is no reload path.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for the plan request
#[derive(Debug, Clone, Serialize)]
pub struct PlanContext {
    /// The raw task text
    pub task: String,
}

/// Context for one iterative drafting pass
#[derive(Debug, Clone, Serialize)]
pub struct DraftContext {
    /// Sanitized task text
    pub task: String,
    /// Sanitized plan outline
    pub plan: String,
    /// 1-based pass number
    pub step: u32,
}

/// Context for the critic's user turn
#[derive(Debug, Clone, Serialize)]
pub struct CriticContext {
    /// Sanitized task text
    pub task: String,
    /// Sanitized candidate answer
    pub candidate: String,
}

/// Context for the revision conversation
///
/// One context serves all three revision templates; each picks the
/// fields it needs.
#[derive(Debug, Clone, Serialize)]
pub struct RevisionContext {
    pub task: String,
    pub draft: String,
    pub critique: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.promptmode/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given directory
    ///
    /// Overrides are looked up under `{root}/.promptmode/prompts/`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let user_dir = root.as_ref().join(".promptmode/prompts");

        let mut hbs = Handlebars::new();
        // Prompt text goes to a model, not a browser
        hbs.register_escape_fn(handlebars::no_escape);

        Self {
            hbs,
            user_dir: if user_dir.exists() { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);

        Self { hbs, user_dir: None }
    }

    /// Load a template by name
    ///
    /// Checks the user override `{name}.pmt` first, then the embedded
    /// fallback.
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Get a template verbatim (system prompts carry no placeholders)
    pub fn raw(&self, name: &str) -> Result<String> {
        self.load_template(name)
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_only_loads_system_prompts() {
        let loader = PromptLoader::embedded_only();

        let system = loader.raw("system-v1").unwrap();
        assert!(system.contains("self-review"));

        let critic = loader.raw("critic-guidelines").unwrap();
        assert!(critic.contains("CRITIC"));
    }

    #[test]
    fn test_render_draft_names_the_pass() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render(
                "draft-user",
                &DraftContext {
                    task: "Fix the email".to_string(),
                    plan: "- do it".to_string(),
                    step: 2,
                },
            )
            .unwrap();

        assert!(rendered.contains("Fix the email"));
        assert!(rendered.contains("- do it"));
        assert!(rendered.contains("pass 2"));
    }

    #[test]
    fn test_render_does_not_html_escape() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader
            .render(
                "critic-user",
                &CriticContext {
                    task: "SELECT * FROM \"users\" <now>".to_string(),
                    candidate: "a & b".to_string(),
                },
            )
            .unwrap();

        assert!(rendered.contains("SELECT * FROM \"users\" <now>"));
        assert!(rendered.contains("a & b"));
    }

    #[test]
    fn test_unknown_template_errors() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.raw("nonexistent-template").is_err());
    }

    #[test]
    fn test_user_override_wins_over_embedded() {
        let tmp = tempfile::tempdir().unwrap();
        let prompt_dir = tmp.path().join(".promptmode/prompts");
        std::fs::create_dir_all(&prompt_dir).unwrap();
        std::fs::write(prompt_dir.join("system-v1.pmt"), "CUSTOM SYSTEM {{missing}}").unwrap();

        let loader = PromptLoader::new(tmp.path());
        let system = loader.raw("system-v1").unwrap();
        assert_eq!(system, "CUSTOM SYSTEM {{missing}}");
    }

    #[test]
    fn test_missing_override_dir_falls_back_to_embedded() {
        let tmp = tempfile::tempdir().unwrap();
        let loader = PromptLoader::new(tmp.path());
        assert!(loader.raw("system-v2").unwrap().contains("PLAN"));
    }
}
