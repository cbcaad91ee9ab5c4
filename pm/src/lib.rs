//! PromptMode - draft / critique / revise orchestration harness
//!
//! PromptMode runs a task through a multi-step conversation loop against
//! a language-model backend and returns an auditable, replayable record
//! of every pass.
//!
//! # Core Concepts
//!
//! - **Two engines**: [`engine::PromptModeV1`] runs exactly one
//!   draft -> critique -> revise cycle; [`engine::PromptModeV2`] plans
//!   first, then iterates with early stopping and a budget guard.
//! - **One capability boundary**: engines depend only on
//!   [`llm::LlmClient`]; the deterministic [`llm::LocalMock`] and the
//!   Anthropic network client are interchangeable behind it.
//! - **Honest budgeting**: rough token estimates with no tokenizer
//!   dependency drive prompt truncation and the stop conditions.
//! - **Auditable runs**: every pass is recorded as a [`domain::PassRecord`]
//!   and persisted as line-delimited JSON.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait, mock and Anthropic implementations
//! - [`engine`] - the V1/V2 orchestration engines
//! - [`budget`] - token estimation and conversation fitting
//! - [`sanitize`] - conversation text normalization
//! - [`diff`] - draft/revision diffs for transcripts
//! - [`domain`] - PassRecord and RunResult artifacts
//! - [`prompts`] - prompt templates with load-or-default semantics
//! - [`transcript`] - JSONL transcript persistence
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod budget;
pub mod cli;
pub mod config;
pub mod diff;
pub mod domain;
pub mod engine;
pub mod llm;
pub mod prompts;
pub mod sanitize;
pub mod transcript;

// Re-export commonly used types
pub use config::{Config, LlmConfig, V1Config, V2Config};
pub use domain::{Mode, PassRecord, RunPhase, RunResult, StopReason};
pub use engine::{PromptModeV1, PromptModeV2};
pub use llm::{AnthropicClient, GenerationConfig, LlmClient, LlmError, LocalMock, Role, Turn, create_client};
pub use prompts::PromptLoader;
pub use transcript::{read_transcript, write_transcript};
