//! Mock generation service for testing.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::error::{Result, SalienceError};

use super::provider::{Conversation, GenerationService, LlmConfig, SamplingParams};

type Handler = Box<dyn Fn(&Conversation) -> String + Send + Sync>;

enum Scripted {
    Text(String),
    Failure(String),
}

/// Mock generator that returns predictable responses for testing.
///
/// Completions are taken from a script, one per requested sample, in call
/// order. A scripted failure fails the whole batch it is drawn in. When the
/// script is exhausted the handler (if any) produces the completion;
/// otherwise the call fails. Every prompt received is recorded.
pub struct MockGenerator {
    config: LlmConfig,
    script: Mutex<VecDeque<Scripted>>,
    handler: Option<Handler>,
    received: Mutex<Vec<Conversation>>,
}

impl MockGenerator {
    /// Create a mock with an empty script and no handler.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::with_model("mock-model"),
            script: Mutex::new(VecDeque::new()),
            handler: None,
            received: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that replays `responses` in order.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mock = Self::new();
        for response in responses {
            mock.push_response(response);
        }
        mock
    }

    /// Create a mock that answers every prompt with `handler`.
    pub fn with_handler(handler: impl Fn(&Conversation) -> String + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
            ..Self::new()
        }
    }

    /// Create with custom configuration.
    pub fn with_config(mut self, config: LlmConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a completion to the script.
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock_script().push_back(Scripted::Text(response.into()));
    }

    /// Append a failure (e.g. a timeout) to the script.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_script()
            .push_back(Scripted::Failure(message.into()));
    }

    /// Prompts received so far, in order.
    pub fn received(&self) -> Vec<Conversation> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of scripted entries not yet consumed.
    pub fn remaining(&self) -> usize {
        self.lock_script().len()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Scripted>> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_completion(&self, prompt: &Conversation) -> Result<String> {
        let next = self.lock_script().pop_front();
        match next {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(SalienceError::Generation(message)),
            None => match &self.handler {
                Some(handler) => Ok(handler(prompt)),
                None => Err(SalienceError::Generation(
                    "mock script exhausted".to_string(),
                )),
            },
        }
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationService for MockGenerator {
    fn generate(
        &self,
        prompts: &[Conversation],
        params: &SamplingParams,
    ) -> Result<Vec<Vec<String>>> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(prompts.iter().cloned());

        prompts
            .iter()
            .map(|prompt| {
                (0..params.n.max(1))
                    .map(|_| self.next_completion(prompt))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
