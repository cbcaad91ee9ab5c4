//! LLM client module
//!
//! One narrow generation capability with interchangeable backends: the
//! engines depend only on [`LlmClient`], never on a concrete
//! implementation, so the deterministic mock can stand in for the network
//! client in tests and offline runs.

use std::sync::Arc;

use tracing::debug;

mod anthropic;
pub mod client;
mod error;
mod local;
mod types;

pub use anthropic::AnthropicClient;
pub use client::LlmClient;
pub use error::LlmError;
pub use local::LocalMock;
pub use types::{GenerationConfig, Role, Turn};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "anthropic" and "mock" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "anthropic" => Ok(Arc::new(AnthropicClient::from_config(config)?)),
        "mock" => Ok(Arc::new(LocalMock::new())),
        other => Err(LlmError::InvalidResponse(format!(
            "Unknown LLM provider: '{}'. Supported: anthropic, mock",
            other
        ))),
    }
}
