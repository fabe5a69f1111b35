//! Generation service trait and request types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A prompt is a list of chat messages.
pub type Conversation = Vec<ChatMessage>;

/// A conversation consisting of a single user message.
pub fn user_conversation(content: impl Into<String>) -> Conversation {
    vec![ChatMessage::user(content)]
}

/// Sampling parameters for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    /// Temperature for generation.
    pub temperature: f64,

    /// Maximum tokens per completion.
    pub max_tokens: usize,

    /// Completions requested per prompt.
    pub n: usize,

    /// Wall-clock limit per request, for network-bound providers.
    pub timeout: Option<Duration>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1024,
            n: 1,
            timeout: None,
        }
    }
}

impl SamplingParams {
    pub fn new(temperature: f64, max_tokens: usize) -> Self {
        Self {
            temperature,
            max_tokens,
            ..Default::default()
        }
    }

    pub fn with_samples(mut self, n: usize) -> Self {
        self.n = n.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Configuration shared by providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-4o-mini-2024-07-18").
    pub model: String,

    /// HTTP client timeout, applied when a call sets no timeout of its own.
    pub request_timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini-2024-07-18".to_string(),
            request_timeout: Duration::from_secs(120),
        }
    }
}

impl LlmConfig {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}

/// An opaque text-generation backend.
///
/// A call submits a batch of prompts and blocks until every prompt has its
/// completions: the result has one entry per prompt, each holding `params.n`
/// completion strings (fewer if the backend could not produce them, e.g. on
/// context overflow). Any failure fails the whole batch.
pub trait GenerationService: Send + Sync {
    /// Generate completions for every prompt in `prompts`.
    fn generate(
        &self,
        prompts: &[Conversation],
        params: &SamplingParams,
    ) -> Result<Vec<Vec<String>>>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;

    /// Model identifier, as used in output paths.
    fn model(&self) -> &str {
        &self.config().model
    }
}

/// First completion of every prompt, or `None` where there is none.
pub fn first_completions(responses: Vec<Vec<String>>) -> Vec<Option<String>> {
    responses
        .into_iter()
        .map(|completions| completions.into_iter().next())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_params_builders() {
        let params = SamplingParams::new(0.0, 512)
            .with_samples(0)
            .with_timeout(Duration::from_secs(60));
        assert_eq!(params.n, 1);
        assert_eq!(params.max_tokens, 512);
        assert_eq!(params.timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_messages_serialize_with_lowercase_roles() {
        let json = serde_json::to_value(user_conversation("hi")).unwrap();
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["content"], "hi");
    }

    #[test]
    fn test_first_completions() {
        let firsts = first_completions(vec![vec!["a".into(), "b".into()], vec![]]);
        assert_eq!(firsts, vec![Some("a".to_string()), None]);
    }
}
