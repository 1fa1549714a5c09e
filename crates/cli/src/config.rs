use anyhow::{anyhow, Result};
use std::env;

use canon_llm::LlmProvider;

pub const DEFAULT_CANON_PATH: &str = "data/canon_cards.jsonl";

#[derive(Debug, Clone)]
pub struct CanonConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub canon_path: String,
    pub temperature: f32,
}

impl CanonConfig {
    pub fn from_env() -> Result<Self> {
        let provider_name = env::var("CANON_PROVIDER").unwrap_or_else(|_| "openai".to_string());
        let provider = LlmProvider::from_str(&provider_name)
            .ok_or_else(|| anyhow!(format!("unknown provider {provider_name}")))?;
        let model =
            env::var("REASONING_MODEL").unwrap_or_else(|_| default_model(provider).to_string());
        let canon_path = env::var("CANON_PATH").unwrap_or_else(|_| DEFAULT_CANON_PATH.to_string());
        let temperature = env::var("CANON_TEMPERATURE")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(0.2);
        Ok(Self {
            provider,
            model,
            canon_path,
            temperature,
        })
    }
}

fn default_model(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::OpenAi => "gpt-4o-mini",
        LlmProvider::Anthropic => "claude-3-5-sonnet",
        LlmProvider::Local => "local",
    }
}
