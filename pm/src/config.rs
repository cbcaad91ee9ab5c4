//! PromptMode configuration types and loading

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main PromptMode configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Single-pass engine defaults
    pub v1: V1Config,

    /// Iterative engine defaults
    pub v2: V2Config,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the API key environment variable is set for network
    /// providers and that both run configs are in range. Call this early
    /// to fail fast with clear error messages.
    pub fn validate(&self) -> Result<()> {
        if self.llm.provider != "mock" && std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        self.v1.validate()?;
        self.v2.validate()?;
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .promptmode.yml
        let local_config = PathBuf::from(".promptmode.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/promptmode/promptmode.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("promptmode").join("promptmode.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "mock")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| eyre!("API key environment variable {} is not set", self.api_key_env))
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
        }
    }
}

/// Parameters shared by both engines
///
/// Created once per run invocation, immutable thereafter, and echoed
/// verbatim into the result for auditability.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct V1Config {
    /// Rough budget for prompt context
    pub max_input_tokens: usize,

    /// Rough cap per generation call
    pub max_output_tokens: usize,

    /// Sampling temperature
    pub temperature: f64,

    /// Per-call timeout ceiling, forwarded to the backend
    pub timeout_seconds: u64,
}

impl Default for V1Config {
    fn default() -> Self {
        Self {
            max_input_tokens: 2000,
            max_output_tokens: 512,
            temperature: 0.2,
            timeout_seconds: 30,
        }
    }
}

impl V1Config {
    /// Reject out-of-range fields
    pub fn validate(&self) -> Result<()> {
        validate_run_fields(
            self.max_input_tokens,
            self.max_output_tokens,
            self.temperature,
            self.timeout_seconds,
        )
    }
}

/// Iterative engine parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct V2Config {
    /// Rough budget for prompt context
    pub max_input_tokens: usize,

    /// Rough cap per generation call
    pub max_output_tokens: usize,

    /// Sampling temperature
    pub temperature: f64,

    /// Per-call timeout ceiling, forwarded to the backend
    pub timeout_seconds: u64,

    /// Upper bound on improvement passes
    pub max_passes: u32,

    /// Critic score threshold for stopping early; absent disables early
    /// stopping entirely
    pub early_stop_score: Option<f64>,
}

impl Default for V2Config {
    fn default() -> Self {
        Self {
            max_input_tokens: 2000,
            max_output_tokens: 512,
            temperature: 0.2,
            timeout_seconds: 30,
            max_passes: 3,
            early_stop_score: Some(0.85),
        }
    }
}

impl V2Config {
    /// Reject out-of-range fields
    pub fn validate(&self) -> Result<()> {
        validate_run_fields(
            self.max_input_tokens,
            self.max_output_tokens,
            self.temperature,
            self.timeout_seconds,
        )?;
        if self.max_passes < 1 {
            return Err(eyre!("max_passes must be at least 1"));
        }
        if let Some(score) = self.early_stop_score
            && !(0.0..=1.0).contains(&score)
        {
            return Err(eyre!("early_stop_score must be in [0.0, 1.0], got {score}"));
        }
        Ok(())
    }
}

fn validate_run_fields(max_input_tokens: usize, max_output_tokens: usize, temperature: f64, timeout_seconds: u64) -> Result<()> {
    if max_input_tokens < 1 {
        return Err(eyre!("max_input_tokens must be at least 1"));
    }
    if max_output_tokens < 1 {
        return Err(eyre!("max_output_tokens must be at least 1"));
    }
    if !(0.0..=2.0).contains(&temperature) {
        return Err(eyre!("temperature must be in [0.0, 2.0], got {temperature}"));
    }
    if timeout_seconds < 1 {
        return Err(eyre!("timeout_seconds must be at least 1"));
    }
    Ok(())
}
