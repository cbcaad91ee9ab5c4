//! Single-pass engine: draft -> critique -> revise, once
//!
//! The simplest orchestration: one cycle, one PassRecord, and a result
//! that degrades gracefully when the backend fails mid-cycle.

use std::sync::Arc;

use eyre::Result;
use tracing::{debug, info, warn};

use super::{CRITIC_MAX_TOKENS, budgeted_prompt, critic_conversation, revision_conversation};
use crate::budget::{estimate, estimate_conversation};
use crate::config::V1Config;
use crate::diff::diff_text;
use crate::domain::{Mode, PassRecord, RunResult, StopReason, utc_now_iso};
use crate::llm::{GenerationConfig, LlmClient};
use crate::prompts::PromptLoader;

/// Single self-review and revision engine
pub struct PromptModeV1 {
    model: Arc<dyn LlmClient>,
    loader: PromptLoader,
    config: V1Config,
}

impl PromptModeV1 {
    /// Create an engine; the config is validated eagerly
    pub fn new(model: Arc<dyn LlmClient>, config: V1Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            loader: PromptLoader::embedded_only(),
            config,
        })
    }

    /// Builder: use a specific prompt loader (file overrides)
    pub fn with_loader(mut self, loader: PromptLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Run one draft -> critique -> revise cycle on the task
    ///
    /// Always yields a RunResult: a backend failure is captured as
    /// `stopped_reason = error` with the best available text as output.
    pub async fn run(&self, task_text: &str) -> Result<RunResult> {
        let started = utc_now_iso();
        info!(task_chars = task_text.len(), "v1 run started");

        let mut passes: Vec<PassRecord> = Vec::new();
        let mut token_total = 0usize;
        let mut stopped_reason = StopReason::Complete;
        let mut error_message = None;

        let final_output = match self.cycle(task_text, &mut passes, &mut token_total).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "v1 run failed");
                stopped_reason = StopReason::Error;
                let message = e.to_string();
                let fallback = passes
                    .last()
                    .map(|p| p.revision.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| format!("ERROR: {message}"));
                error_message = Some(message);
                fallback
            }
        };

        info!(passes = passes.len(), token_total, %stopped_reason, "v1 run finished");

        Ok(RunResult::new(Mode::V1, final_output)?
            .with_passes(passes)
            .with_token_count(token_total)
            .with_stopped_reason(stopped_reason)
            .with_error_message(error_message)
            .with_timestamps(started, utc_now_iso())
            .with_config_snapshot(serde_json::to_value(&self.config)?))
    }

    /// The one cycle; any failure aborts the whole run
    async fn cycle(&self, task_text: &str, passes: &mut Vec<PassRecord>, token_total: &mut usize) -> Result<String> {
        let system_v1 = self.loader.raw("system-v1")?;
        let params = GenerationConfig {
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
            timeout_seconds: self.config.timeout_seconds,
        };

        // DRAFT
        let draft_msgs = budgeted_prompt(&system_v1, task_text, self.config.max_input_tokens);
        let draft = self.model.generate(&draft_msgs, &params).await?;
        *token_total += estimate_conversation(&draft_msgs) + estimate(&draft);
        debug!(tokens = *token_total, "v1 draft complete");

        // CRITIQUE - stable critic, forced to temperature 0
        let critic_msgs = critic_conversation(&self.loader, task_text, &draft)?;
        let critic_params = GenerationConfig {
            temperature: 0.0,
            max_tokens: CRITIC_MAX_TOKENS,
            timeout_seconds: self.config.timeout_seconds,
        };
        let critique = self.model.generate(&critic_msgs, &critic_params).await?;
        *token_total += estimate_conversation(&critic_msgs) + estimate(&critique);
        debug!(tokens = *token_total, "v1 critique complete");

        // REVISION
        let revision_msgs = revision_conversation(&self.loader, &system_v1, task_text, &draft, &critique)?;
        let revision = self.model.generate(&revision_msgs, &params).await?;
        *token_total += estimate_conversation(&revision_msgs) + estimate(&revision);
        debug!(tokens = *token_total, "v1 revision complete");

        let diff = diff_text(&draft, &revision);
        let final_output = {
            let trimmed = revision.trim();
            if trimmed.is_empty() {
                draft.trim().to_string()
            } else {
                trimmed.to_string()
            }
        };

        passes.push(
            PassRecord::new(1, draft, revision)
                .with_critique(critique)
                .with_diff(diff)
                .with_token_estimate(*token_total)
                .with_meta("mode", "v1"),
        );

        Ok(final_output)
    }
}
