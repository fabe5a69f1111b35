//! Ollama local LLM provider implementation.
//!
//! Ollama allows running LLMs locally without API keys.
//! Install from: https://ollama.ai

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, SalienceError};

use super::provider::{Conversation, GenerationService, LlmConfig, SamplingParams};

/// Default Ollama API endpoint.
const DEFAULT_API_URL: &str = "http://localhost:11434/api/chat";

/// Ollama local LLM provider.
///
/// Ollama returns one completion per request, so `n` samples are drawn with
/// `n` sequential requests.
pub struct OllamaProvider {
    client: Client,
    api_url: String,
    config: LlmConfig,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    ///
    /// Uses llama3.1 by default. Make sure you've pulled it:
    /// `ollama pull llama3.1`
    pub fn new() -> Result<Self> {
        Self::with_model("llama3.1")
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(LlmConfig::with_model(model))
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SalienceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = std::env::var("OLLAMA_HOST")
            .map(|host| format!("{}/api/chat", host.trim_end_matches('/')))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        Ok(Self {
            client,
            api_url,
            config,
        })
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send a conversation to Ollama and return a single completion.
    fn send_conversation(&self, messages: &Conversation, params: &SamplingParams) -> Result<String> {
        let body = json!({
            "model": self.config.model,
            "stream": false,
            "options": {
                "temperature": params.temperature,
                "num_predict": params.max_tokens
            },
            "messages": messages,
        });

        let mut request = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers())
            .json(&body);
        if let Some(timeout) = params.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                SalienceError::Generation(
                    "Failed to connect to Ollama. Is it running? Start with: ollama serve"
                        .to_string(),
                )
            } else {
                SalienceError::Generation(format!("Ollama request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();

            // Check for model not found error
            if error_text.contains("not found") {
                return Err(SalienceError::Config(format!(
                    "Model '{}' not found. Pull it with: ollama pull {}",
                    self.config.model, self.config.model
                )));
            }

            return Err(SalienceError::Generation(format!(
                "Ollama error ({}): {}",
                status, error_text
            )));
        }

        let api_response: OllamaResponse = response.json().map_err(|e| {
            SalienceError::Generation(format!("Failed to parse Ollama response: {}", e))
        })?;

        Ok(api_response.message.content)
    }
}

impl GenerationService for OllamaProvider {
    fn generate(
        &self,
        prompts: &[Conversation],
        params: &SamplingParams,
    ) -> Result<Vec<Vec<String>>> {
        debug!(model = %self.config.model, prompts = prompts.len(), n = params.n, "ollama batch");
        prompts
            .iter()
            .map(|messages| {
                (0..params.n.max(1))
                    .map(|_| self.send_conversation(messages, params))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama API response structure.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}
