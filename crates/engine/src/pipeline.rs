use tracing::debug;

use crate::context::{assemble, ExternalDoc};
use crate::error::{CompletionStage, EngineError, Result};
use crate::retriever::{PackBias, Retriever};
use canon_llm::{LlmClient, LlmRequest, LlmResponse};

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub query: String,
    pub system_prompt: String,
    pub opinion_prompt: String,
    pub critique_prompt: String,
    pub pasted_text: Option<String>,
    pub top_k: usize,
    pub pack_bias: PackBias,
    pub temperature: f32,
}

/// The pipeline's sole output: the grounded opinion, the adversarial
/// critique conditioned on it, and the evidence context both cite.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub opinion: String,
    pub critique: String,
    pub context: String,
    pub metrics: AnalysisMetrics,
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisMetrics {
    pub retrieved: usize,
    pub context_tokens: usize,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// Runs the two-stage evidence-grounded pipeline: retrieve, assemble,
/// opinion completion, then critique completion conditioned on the
/// opinion. The two calls are sequential and dependent; a failed
/// opinion stage skips the critique stage. The pipeline holds no
/// state between invocations and never retries, so independent
/// queries may run concurrently against a shared Retriever.
pub fn analyze(
    retriever: &Retriever,
    client: &LlmClient,
    request: &AnalysisRequest,
) -> Result<AnalysisResult> {
    let hits = retriever.retrieve(&request.query, request.top_k, &request.pack_bias)?;
    let external: Vec<ExternalDoc> = request
        .pasted_text
        .as_deref()
        .map(|text| vec![ExternalDoc::pasted(text)])
        .unwrap_or_default();
    let context = assemble(&hits, &external);
    let context_tokens = estimate_context_tokens(&context);
    debug!(
        hits = hits.len(),
        external = external.len(),
        context_tokens,
        "evidence context assembled"
    );

    let opinion_user = format!(
        "{}\n\nQUESTION:\n{}\n\nCONTEXT:\n{}",
        request.opinion_prompt.trim(),
        request.query.trim(),
        context
    );
    let opinion = complete(
        client,
        request,
        opinion_user,
        CompletionStage::Opinion,
    )?;

    let critique_user = format!(
        "{}\n\nQUESTION:\n{}\n\nCONTEXT:\n{}\n\nOPINION UNDER REVIEW:\n{}",
        request.critique_prompt.trim(),
        request.query.trim(),
        context,
        opinion.content
    );
    let critique = complete(
        client,
        request,
        critique_user,
        CompletionStage::Critique,
    )?;

    let metrics = AnalysisMetrics {
        retrieved: hits.len(),
        context_tokens,
        prompt_tokens: opinion
            .prompt_tokens
            .saturating_add(critique.prompt_tokens),
        completion_tokens: opinion
            .completion_tokens
            .saturating_add(critique.completion_tokens),
    };
    Ok(AnalysisResult {
        opinion: opinion.content,
        critique: critique.content,
        context,
        metrics,
    })
}

fn complete(
    client: &LlmClient,
    request: &AnalysisRequest,
    user: String,
    stage: CompletionStage,
) -> Result<LlmResponse> {
    let llm_request = LlmRequest::new(&request.system_prompt, user, request.temperature);
    client
        .chat_blocking(&llm_request)
        .map_err(|source| EngineError::CompletionService { stage, source })
}

fn estimate_context_tokens(context: &str) -> usize {
    match tiktoken_rs::cl100k_base() {
        Ok(encoder) => encoder.encode_with_special_tokens(context).len(),
        Err(err) => {
            debug!(error = %err, "token estimate unavailable");
            0
        }
    }
}
