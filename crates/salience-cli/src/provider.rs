//! Generation backend selection.

use std::time::Duration;

use salience::{GenerationService, LlmConfig, OllamaProvider, OpenAIProvider};

use crate::cli::{LlmArgs, LlmProviderChoice};

const OLLAMA_DEFAULT_MODEL: &str = "llama3.1";

/// Build the provider chosen on the command line.
pub fn build(args: &LlmArgs) -> Result<Box<dyn GenerationService>, Box<dyn std::error::Error>> {
    let request_timeout = Duration::from_secs(args.timeout);

    let provider: Box<dyn GenerationService> = match args.llm {
        LlmProviderChoice::OpenAI => {
            let mut config = LlmConfig {
                request_timeout,
                ..LlmConfig::default()
            };
            if let Some(model) = &args.model {
                config.model = model.clone();
            }
            Box::new(OpenAIProvider::from_env(config)?)
        }
        LlmProviderChoice::Ollama => {
            let config = LlmConfig {
                model: args
                    .model
                    .clone()
                    .unwrap_or_else(|| OLLAMA_DEFAULT_MODEL.to_string()),
                request_timeout,
            };
            Box::new(OllamaProvider::with_config(config)?)
        }
    };

    tracing::debug!(provider = provider.name(), model = provider.model(), "provider ready");
    Ok(provider)
}

/// Model name usable as a single path component.
pub fn model_dir(model: &str) -> String {
    model.replace(['/', ':'], "_")
}
