//! Iterative engine: plan, then draft -> critique -> revise passes
//!
//! Runs a lightweight planning call followed by up to N improvement
//! passes. Each pass records a full PassRecord; the loop exits early when
//! the critic's self-reported score clears the configured threshold or
//! when the cumulative token spend crosses the budget guard.

use std::sync::Arc;
use std::time::Instant;

use eyre::Result;
use tracing::{debug, info, warn};

use super::score::parse_overall_score;
use super::{
    CRITIC_MAX_TOKENS, PLAN_MAX_TOKENS, PLAN_TEMPERATURE, budgeted_prompt, critic_conversation,
    revision_conversation,
};
use crate::budget::{estimate, estimate_conversation, fit_conversation};
use crate::config::V2Config;
use crate::diff::diff_text;
use crate::domain::{Mode, PassRecord, RunResult, StopReason, utc_now_iso};
use crate::llm::{GenerationConfig, LlmClient, Turn};
use crate::prompts::{DraftContext, PlanContext, PromptLoader, embedded};
use crate::sanitize::sanitize;

/// Budget guard slack: plan plus per-step draft/critique/revise overhead
const BUDGET_GUARD_MULTIPLIER: usize = 4;

/// Planner plus multi-pass critique/revision engine
pub struct PromptModeV2 {
    model: Arc<dyn LlmClient>,
    loader: PromptLoader,
    max_passes: u32,
    config: V2Config,
}

impl PromptModeV2 {
    /// Create an engine; the config is validated eagerly
    ///
    /// `max_passes` is the caller's request; the effective bound is the
    /// smaller of it and the config's ceiling, minimum 1.
    pub fn new(model: Arc<dyn LlmClient>, max_passes: u32, config: V2Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model,
            loader: PromptLoader::embedded_only(),
            max_passes,
            config,
        })
    }

    /// Builder: use a specific prompt loader (file overrides)
    pub fn with_loader(mut self, loader: PromptLoader) -> Self {
        self.loader = loader;
        self
    }

    fn run_params(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.temperature,
            max_tokens: self.config.max_output_tokens,
            timeout_seconds: self.config.timeout_seconds,
        }
    }

    /// Run the full plan + iterate protocol on the task
    ///
    /// Always yields a RunResult; only the planning step may fail without
    /// ending the run.
    pub async fn run(&self, task_text: &str) -> Result<RunResult> {
        let started = utc_now_iso();
        info!(task_chars = task_text.len(), max_passes = self.max_passes, "v2 run started");

        let mut passes: Vec<PassRecord> = Vec::new();
        let mut token_total = 0usize;
        let mut stopped_reason = StopReason::Complete;
        let mut error_message: Option<String> = None;

        let system_v2 = self.loader.raw("system-v2")?;

        // PLANNING - the one absorbed failure: fall back to a generic
        // plan and keep going, recording the failure as a diagnostic.
        let plan_user = self.loader.render(
            "plan-user",
            &PlanContext {
                task: task_text.to_string(),
            },
        )?;
        let plan_msgs = budgeted_prompt(&system_v2, &plan_user, self.config.max_input_tokens);
        let plan_params = GenerationConfig {
            temperature: PLAN_TEMPERATURE,
            max_tokens: PLAN_MAX_TOKENS,
            timeout_seconds: self.config.timeout_seconds,
        };
        let plan = match self.model.generate(&plan_msgs, &plan_params).await {
            Ok(p) => {
                token_total += estimate_conversation(&plan_msgs) + estimate(&p);
                p
            }
            Err(e) => {
                warn!(error = %e, "planning failed, continuing with fallback plan");
                error_message = Some(format!("plan_error: {e}"));
                embedded::FALLBACK_PLAN.to_string()
            }
        };

        let final_output = match self
            .iterate(task_text, &plan, &system_v2, &mut passes, &mut token_total, &mut stopped_reason)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "v2 run failed");
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

        info!(passes = passes.len(), token_total, %stopped_reason, "v2 run finished");

        Ok(RunResult::new(Mode::V2, final_output)?
            .with_passes(passes)
            .with_token_count(token_total)
            .with_stopped_reason(stopped_reason)
            .with_error_message(error_message)
            .with_timestamps(started, utc_now_iso())
            .with_config_snapshot(serde_json::to_value(&self.config)?))
    }

    /// The improvement loop; any failure here aborts the run
    async fn iterate(
        &self,
        task_text: &str,
        plan: &str,
        system_v2: &str,
        passes: &mut Vec<PassRecord>,
        token_total: &mut usize,
        stopped_reason: &mut StopReason,
    ) -> Result<String> {
        let bound = self.max_passes.min(self.config.max_passes).max(1);
        let params = self.run_params();
        let critic_params = GenerationConfig {
            temperature: 0.0,
            max_tokens: CRITIC_MAX_TOKENS,
            timeout_seconds: self.config.timeout_seconds,
        };
        let budget_guard = (self.config.max_input_tokens + self.config.max_output_tokens) * BUDGET_GUARD_MULTIPLIER;

        for step in 1..=bound {
            let pass_started = Instant::now();

            // DRAFT for this pass, naming the pass number
            let draft_user = self.loader.render(
                "draft-user",
                &DraftContext {
                    task: sanitize(task_text),
                    plan: sanitize(plan),
                    step,
                },
            )?;
            let draft_turns = vec![Turn::system(system_v2.to_string()), Turn::user(draft_user)];
            let draft_msgs = fit_conversation(&draft_turns, self.config.max_input_tokens, true);
            let draft = self.model.generate(&draft_msgs, &params).await?;
            *token_total += estimate_conversation(&draft_msgs) + estimate(&draft);

            // CRITIQUE - same protocol as V1
            let critic_msgs = critic_conversation(&self.loader, task_text, &draft)?;
            let critique = self.model.generate(&critic_msgs, &critic_params).await?;
            *token_total += estimate_conversation(&critic_msgs) + estimate(&critique);

            // REVISION
            let revision_msgs = revision_conversation(&self.loader, system_v2, task_text, &draft, &critique)?;
            let revision = self.model.generate(&revision_msgs, &params).await?;
            *token_total += estimate_conversation(&revision_msgs) + estimate(&revision);

            let diff = diff_text(&draft, &revision);
            let elapsed_ms = pass_started.elapsed().as_millis() as u64;
            let score = parse_overall_score(&critique).unwrap_or(0.0);
            debug!(step, score, tokens = *token_total, elapsed_ms, "v2 pass complete");

            passes.push(
                PassRecord::new(step, draft, revision)
                    .with_plan(plan)
                    .with_critique(critique)
                    .with_diff(diff)
                    .with_token_estimate(*token_total)
                    .with_elapsed_ms(elapsed_ms)
                    .with_meta("mode", "v2"),
            );

            // Early stop if the critic says we're good enough
            if let Some(threshold) = self.config.early_stop_score
                && score >= threshold
            {
                info!(step, score, threshold, "early stop");
                *stopped_reason = StopReason::EarlyStop;
                break;
            }

            // Budget guard
            if *token_total >= budget_guard {
                info!(step, tokens = *token_total, budget_guard, "token budget exhausted");
                *stopped_reason = StopReason::TokenBudget;
                break;
            }

            // Max passes guard is covered by the loop bounds
        }

        let mut final_output = passes
            .last()
            .map(|p| p.revision.trim().to_string())
            .unwrap_or_default();

        if final_output.is_empty() {
            // Last resort: one plain generation from the raw task
            let fallback_msgs = budgeted_prompt(system_v2, task_text, self.config.max_input_tokens);
            let text = self.model.generate(&fallback_msgs, &params).await?;
            *token_total += estimate_conversation(&fallback_msgs) + estimate(&text);
            final_output = text.trim().to_string();
        }

        Ok(final_output)
    }
}
