use anyhow::{bail, Context, Result};
use std::fs;

use canon_engine::{analyze, AnalysisRequest, EmbeddingClient, LlmClient, Retriever};

use crate::config::CanonConfig;
use crate::logging;
use crate::modes;
use crate::prompts;

#[allow(clippy::too_many_arguments)]
pub fn run(
    query: String,
    mode_name: String,
    canon_override: Option<String>,
    paste_file: Option<String>,
    top_k_override: Option<usize>,
    show_context: bool,
) -> Result<()> {
    if query.trim().is_empty() {
        bail!("query must not be empty");
    }
    let config = CanonConfig::from_env()?;
    let mode = modes::find(&mode_name)
        .ok_or_else(|| anyhow::anyhow!(format!("unknown mode `{mode_name}`, see `canon modes`")))?;
    let top_k = top_k_override.unwrap_or(mode.top_k);
    if top_k == 0 {
        bail!("top-k must be positive");
    }

    let canon_path = canon_override.unwrap_or_else(|| config.canon_path.clone());
    logging::stage(logging::Stage::Corpus, format!("loading {canon_path}"));
    let embeddings = EmbeddingClient::from_env()?;
    let retriever = Retriever::from_path(&canon_path, embeddings)?;
    logging::detail(format!("loaded {} cards", retriever.cards().len()));

    let pasted_text = paste_file
        .map(|path| {
            fs::read_to_string(&path).with_context(|| format!("failed to read paste file {path}"))
        })
        .transpose()?;

    let client = LlmClient::new(config.provider, &config.model)?;
    let request = AnalysisRequest {
        query,
        system_prompt: prompts::SYSTEM_PROMPT.to_string(),
        opinion_prompt: prompts::OPINION_PROMPT.to_string(),
        critique_prompt: prompts::CRITIQUE_PROMPT.to_string(),
        pasted_text,
        top_k,
        pack_bias: mode.pack_bias()?,
        temperature: config.temperature,
    };
    logging::stage(
        logging::Stage::Analyze,
        format!(
            "mode {} top_k {} model {}/{}",
            mode.name,
            top_k,
            config.provider.as_str(),
            config.model
        ),
    );

    let result = analyze(&retriever, &client, &request)?;

    println!("## Opinion\n\n{}\n", result.opinion);
    println!("## Critique\n\n{}\n", result.critique);
    if show_context {
        println!("## Evidence context\n\n{}\n", result.context);
    }
    logging::stage(
        logging::Stage::Metrics,
        format!(
            "retrieved {} cards, context ~{} tokens, usage {}+{} tokens",
            result.metrics.retrieved,
            result.metrics.context_tokens,
            result.metrics.prompt_tokens,
            result.metrics.completion_tokens
        ),
    );
    Ok(())
}
