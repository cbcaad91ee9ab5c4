//! RunResult - the final bundle returned by a run
//!
//! One RunResult per `run()` invocation, constructed exactly once at the
//! end. It exclusively owns its PassRecords in step order.

use eyre::{Result, eyre};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::record::PassRecord;
use super::utc_now_iso;

/// Engine variant that produced a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    V1,
    V2,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" => Ok(Self::V1),
            "v2" => Ok(Self::V2),
            _ => Err(format!("Unknown mode: {}. Use: v1 or v2", s)),
        }
    }
}

/// Why a run stopped
///
/// Budget exhaustion and early stop are designed stop conditions, not
/// errors; only `Error` carries a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    Complete,
    EarlyStop,
    MaxPasses,
    TokenBudget,
    Timeout,
    Error,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::EarlyStop => write!(f, "early_stop"),
            Self::MaxPasses => write!(f, "max_passes"),
            Self::TokenBudget => write!(f, "token_budget"),
            Self::Timeout => write!(f, "timeout"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Final artifact of a V1/V2 run
///
/// Callers receive one of these in all cases - degraded outcomes are
/// signalled through `stopped_reason` and `error_message`, never by an
/// absent result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    /// Engine variant tag
    pub mode: Mode,

    /// The last accepted text; never empty
    pub final_output: String,

    /// Chronological pass records, in strict step order
    #[serde(default)]
    pub passes: Vec<PassRecord>,

    /// Rough total token count (inputs + outputs)
    #[serde(default)]
    pub token_count: usize,

    /// Why the run stopped
    #[serde(default)]
    pub stopped_reason: StopReason,

    /// Error detail when `stopped_reason` is `error` (or a non-fatal
    /// planning diagnostic)
    pub error_message: Option<String>,

    /// Run start timestamp (ISO-8601 UTC)
    pub started_at: String,

    /// Run finish timestamp (ISO-8601 UTC)
    pub finished_at: String,

    /// Echo of the config the run used, for auditability
    #[serde(default)]
    pub config_snapshot: Value,

    /// Lightweight metadata bag
    #[serde(default)]
    pub meta: HashMap<String, String>,
}

impl RunResult {
    /// Create a result; rejects empty final output
    ///
    /// The trimmed final output must be non-empty - orchestrators
    /// substitute a diagnostic placeholder rather than violate this.
    pub fn new(mode: Mode, final_output: impl Into<String>) -> Result<Self> {
        let final_output = final_output.into().trim().to_string();
        if final_output.is_empty() {
            return Err(eyre!("final_output must not be empty"));
        }

        Ok(Self {
            mode,
            final_output,
            passes: Vec::new(),
            token_count: 0,
            stopped_reason: StopReason::Complete,
            error_message: None,
            started_at: utc_now_iso(),
            finished_at: utc_now_iso(),
            config_snapshot: Value::Null,
            meta: HashMap::new(),
        })
    }

    /// Builder: attach the pass records
    pub fn with_passes(mut self, passes: Vec<PassRecord>) -> Self {
        self.passes = passes;
        self
    }

    /// Builder: set the total token count
    pub fn with_token_count(mut self, tokens: usize) -> Self {
        self.token_count = tokens;
        self
    }

    /// Builder: set the stop reason
    pub fn with_stopped_reason(mut self, reason: StopReason) -> Self {
        self.stopped_reason = reason;
        self
    }

    /// Builder: set the error message
    pub fn with_error_message(mut self, message: Option<String>) -> Self {
        self.error_message = message;
        self
    }

    /// Builder: set start/finish timestamps
    pub fn with_timestamps(mut self, started_at: impl Into<String>, finished_at: impl Into<String>) -> Self {
        self.started_at = started_at.into();
        self.finished_at = finished_at.into();
        self
    }

    /// Builder: attach the config snapshot
    pub fn with_config_snapshot(mut self, snapshot: Value) -> Self {
        self.config_snapshot = snapshot;
        self
    }

    /// Check whether the run ended on an error
    pub fn is_error(&self) -> bool {
        self.stopped_reason == StopReason::Error
    }
}
