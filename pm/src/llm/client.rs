//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerationConfig, LlmError, Turn};

/// Stateless LLM client - each call is independent (fresh context)
///
/// This is the single capability boundary the engines depend on. A
/// conversation plus generation parameters go in, assistant text comes
/// out. Any transport problem or empty response surfaces as an `LlmError`;
/// there is no other failure signal.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate the assistant's text for the given conversation
    ///
    /// Implementations must treat the conversation as read-only and must
    /// return an error rather than an empty string.
    async fn generate(&self, conversation: &[Turn], params: &GenerationConfig) -> Result<String, LlmError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted client for unit tests - replays canned responses in order
    pub struct ScriptedClient {
        responses: Vec<String>,
        call_count: AtomicUsize,
    }

    impl ScriptedClient {
        pub fn new(responses: Vec<&str>) -> Self {
            Self {
                responses: responses.into_iter().map(String::from).collect(),
                call_count: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedClient {
        async fn generate(&self, _conversation: &[Turn], _params: &GenerationConfig) -> Result<String, LlmError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            self.responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::InvalidResponse("No more scripted responses".to_string()))
        }
    }

    /// Client that fails every call
    pub struct FailingClient;

    #[async_trait]
    impl LlmClient for FailingClient {
        async fn generate(&self, _conversation: &[Turn], _params: &GenerationConfig) -> Result<String, LlmError> {
            Err(LlmError::ApiError {
                status: 500,
                message: "simulated backend failure".to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_scripted_client_returns_responses_in_order() {
            let client = ScriptedClient::new(vec!["first", "second"]);
            let params = GenerationConfig::default();

            let first = client.generate(&[Turn::user("hi")], &params).await.unwrap();
            assert_eq!(first, "first");

            let second = client.generate(&[Turn::user("hi")], &params).await.unwrap();
            assert_eq!(second, "second");

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_scripted_client_errors_when_exhausted() {
            let client = ScriptedClient::new(vec![]);
            let result = client.generate(&[], &GenerationConfig::default()).await;
            assert!(result.is_err());
        }

        #[tokio::test]
        async fn test_failing_client_always_fails() {
            let client = FailingClient;
            let result = client.generate(&[Turn::user("hi")], &GenerationConfig::default()).await;
            assert!(matches!(result, Err(LlmError::ApiError { status: 500, .. })));
        }
    }
}
