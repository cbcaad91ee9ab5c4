//! Conversation and generation-parameter types shared by all backends
//!
//! These types model a chat-style exchange but are provider-agnostic:
//! adapters translate them into whatever wire format their API expects.

use serde::{Deserialize, Serialize};

/// Turn role within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single turn in a conversation
///
/// Conversations are built fresh for every generation call and are never
/// mutated by a backend (the trait only hands out `&[Turn]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one generation call
///
/// Immutable per call. The timeout is forwarded to the backend as a
/// ceiling; the orchestrators never enforce it themselves.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Sampling temperature in [0.0, 2.0]
    pub temperature: f64,

    /// Rough cap on generated tokens
    pub max_tokens: usize,

    /// Per-call timeout ceiling in seconds
    pub timeout_seconds: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_tokens: 512,
            timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors() {
        let system = Turn::system("be helpful");
        assert_eq!(system.role, Role::System);
        assert_eq!(system.content, "be helpful");

        let user = Turn::user("hello");
        assert_eq!(user.role, Role::User);

        let assistant = Turn::assistant("hi there");
        assert_eq!(assistant.role, Role::Assistant);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let turn = Turn::user("hello");
        let json = serde_json::to_string(&turn).unwrap();
        assert!(json.contains("\"role\":\"user\""));

        let back: Turn = serde_json::from_str(&json).unwrap();
        assert_eq!(back, turn);
    }

    #[test]
    fn test_generation_config_defaults() {
        let params = GenerationConfig::default();
        assert_eq!(params.temperature, 0.2);
        assert_eq!(params.max_tokens, 512);
        assert_eq!(params.timeout_seconds, 30);
    }
}
