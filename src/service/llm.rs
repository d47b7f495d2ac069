//! Shared LLM client
//!
//! Wraps the OpenAI provider used by both prediction prompts.

use rig::providers::openai;

/// Environment variable holding the OpenAI API key
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: openai::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = openai::Client::new(api_key);

        Ok(Self { client })
    }

    /// Resolve a model name from an environment variable, falling back to `default`
    pub fn model_from_env(var: &str, default: &str) -> String {
        std::env::var(var)
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Underlying OpenAI client, used to build extractors
    pub fn openai_client(&self) -> &openai::Client {
        &self.client
    }
}
