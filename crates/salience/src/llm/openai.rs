//! OpenAI-compatible chat completions provider.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{Result, SalienceError};

use super::provider::{Conversation, GenerationService, LlmConfig, SamplingParams};

/// OpenAI API endpoint.
const API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Provider for the OpenAI chat completions API and compatible servers
/// (vLLM, LiteLLM proxies) via `OPENAI_BASE_URL`.
pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    api_url: String,
    config: LlmConfig,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, LlmConfig::default())
    }

    /// Create a new OpenAI provider with custom configuration.
    pub fn with_config(api_key: impl Into<String>, config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| SalienceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let api_url = std::env::var("OPENAI_BASE_URL")
            .map(|base| format!("{}/chat/completions", base.trim_end_matches('/')))
            .unwrap_or_else(|_| API_URL.to_string());

        Ok(Self {
            client,
            api_key: api_key.into(),
            api_url,
            config,
        })
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env(config: LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            SalienceError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Self::with_config(api_key, config)
    }

    /// Build headers for API requests.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| SalienceError::Config(format!("Invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    /// Send one conversation and return all of its choices.
    fn send_conversation(
        &self,
        messages: &Conversation,
        params: &SamplingParams,
    ) -> Result<Vec<String>> {
        let body = json!({
            "model": self.config.model,
            "max_tokens": params.max_tokens,
            "temperature": params.temperature,
            "n": params.n,
            "messages": messages,
        });

        let mut request = self
            .client
            .post(&self.api_url)
            .headers(self.build_headers()?)
            .json(&body);
        if let Some(timeout) = params.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .map_err(|e| SalienceError::Generation(format!("API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(SalienceError::Generation(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: OpenAIResponse = response.json().map_err(|e| {
            SalienceError::Generation(format!("Failed to parse API response: {}", e))
        })?;

        Ok(api_response
            .choices
            .into_iter()
            .map(|choice| choice.message.content.unwrap_or_default())
            .collect())
    }
}

impl GenerationService for OpenAIProvider {
    fn generate(
        &self,
        prompts: &[Conversation],
        params: &SamplingParams,
    ) -> Result<Vec<Vec<String>>> {
        debug!(model = %self.config.model, prompts = prompts.len(), n = params.n, "openai batch");
        prompts
            .iter()
            .map(|messages| self.send_conversation(messages, params))
            .collect()
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// OpenAI API response structure.
#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_with_null_content_parses() {
        let raw = r#"{"choices":[{"message":{"content":"ok"}},{"message":{"content":null}}]}"#;
        let parsed: OpenAIResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices.len(), 2);
        assert_eq!(parsed.choices[1].message.content, None);
    }

    #[test]
    fn test_provider_reports_model() {
        let provider =
            OpenAIProvider::with_config("key", LlmConfig::with_model("gpt-4o-2024-08-06")).unwrap();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model(), "gpt-4o-2024-08-06");
    }
}
