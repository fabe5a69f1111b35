//! Generation service integration.
//!
//! Every pipeline stage that needs a language model talks to a
//! [`GenerationService`]: a blocking call that takes a batch of prompts and
//! returns `n` completions per prompt. Model output is parsed with the
//! tolerant [`repair_json`].
//!
//! # Supported Providers
//!
//! - **OpenAI** - chat completions API (requires `OPENAI_API_KEY`; point
//!   `OPENAI_BASE_URL` at a vLLM or LiteLLM server to use other models)
//! - **Ollama** - local models, no API key needed (`OLLAMA_HOST`)
//! - **Mock** - scripted responses for tests
//!
//! # Example
//!
//! ```no_run
//! use salience::llm::{user_conversation, GenerationService, OllamaProvider, SamplingParams};
//!
//! let provider = OllamaProvider::new().unwrap();
//! let completions = provider
//!     .generate(&[user_conversation("Say hello.")], &SamplingParams::default())
//!     .unwrap();
//! println!("{}", completions[0][0]);
//! ```

mod json;
mod mock;
mod ollama;
mod openai;
pub mod prompts;
mod provider;

pub use json::{parse_repaired, repair_json};
pub use mock::MockGenerator;
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use provider::{
    first_completions, user_conversation, ChatMessage, Conversation, GenerationService,
    LlmConfig, Role, SamplingParams,
};
