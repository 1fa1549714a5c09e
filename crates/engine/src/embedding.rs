use anyhow::{anyhow, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::hash_map::DefaultHasher;
use std::env;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-large";
pub const DEFAULT_HASH_DIMENSIONS: usize = 256;

#[derive(Clone)]
pub enum EmbeddingBackend {
    Hash(HashEmbedder),
    OpenAi(OpenAiEmbeddingClient),
}

#[derive(Clone)]
pub struct EmbeddingClient {
    backend: EmbeddingBackend,
    // Shared across clones so a caller holding a clone can observe
    // how often the backend was actually hit.
    batch_calls: Arc<AtomicUsize>,
}

impl EmbeddingClient {
    /// Selects a backend from `EMBEDDING_PROVIDER`: `openai` for the
    /// hosted service, anything else for the offline hash embedder.
    pub fn from_env() -> Result<Self> {
        match env::var("EMBEDDING_PROVIDER")
            .unwrap_or_else(|_| "hash".to_string())
            .to_lowercase()
            .as_str()
        {
            "openai" => {
                let model = env::var("EMBEDDING_MODEL")
                    .unwrap_or_else(|_| DEFAULT_OPENAI_EMBEDDING_MODEL.to_string());
                Self::openai(&model)
            }
            _ => {
                let dims = env::var("CANON_HASH_DIMENSIONS")
                    .ok()
                    .and_then(|value| value.parse::<usize>().ok())
                    .unwrap_or(DEFAULT_HASH_DIMENSIONS);
                Ok(Self::wrap(EmbeddingBackend::Hash(HashEmbedder::new(
                    dims,
                    HashEmbedder::DEFAULT_SEED,
                ))))
            }
        }
    }

    pub fn hash() -> Self {
        Self::wrap(EmbeddingBackend::Hash(HashEmbedder::default()))
    }

    pub fn openai(model: &str) -> Result<Self> {
        Ok(Self::wrap(EmbeddingBackend::OpenAi(
            OpenAiEmbeddingClient::new(model)?,
        )))
    }

    fn wrap(backend: EmbeddingBackend) -> Self {
        Self {
            backend,
            batch_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        self.batch_calls.fetch_add(1, Ordering::Relaxed);
        match &self.backend {
            EmbeddingBackend::Hash(embedder) => Ok(inputs
                .iter()
                .map(|text| embedder.embed_text(text))
                .collect()),
            EmbeddingBackend::OpenAi(client) => client.embed_batch(inputs),
        }
    }

    pub fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let inputs = vec![text.to_string()];
        self.embed_batch(&inputs)?
            .pop()
            .ok_or_else(|| anyhow!("embedding service returned no vector"))
    }

    /// Number of backend requests issued so far, shared across
    /// clones of this client.
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::Relaxed)
    }
}

/// Deterministic bag-of-tokens embedder: each token is hashed into a
/// fixed bucket and counted. Not a semantic model; it keeps the
/// engine runnable offline and makes tests reproducible.
#[derive(Clone)]
pub struct HashEmbedder {
    dimensions: usize,
    seed: u64,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSIONS, Self::DEFAULT_SEED)
    }
}

impl HashEmbedder {
    pub const DEFAULT_SEED: u64 = 0x5eed;

    pub fn new(dimensions: usize, seed: u64) -> Self {
        Self {
            dimensions: dimensions.max(1),
            seed,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions];
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty());
        for token in tokens {
            vector[self.bucket(token)] += 1.0;
        }
        vector
    }

    // Case-insensitive without allocating a lowercased copy.
    fn bucket(&self, token: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        for byte in token.as_bytes() {
            byte.to_ascii_lowercase().hash(&mut hasher);
        }
        (hasher.finish() as usize) % self.dimensions
    }
}

#[derive(Clone)]
pub struct OpenAiEmbeddingClient {
    http: Client,
    model: String,
    api_key: String,
}

impl OpenAiEmbeddingClient {
    pub fn new(model: &str) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY is required for openai embeddings"))?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            model: model.to_string(),
            api_key,
        })
    }

    pub fn embed_batch(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let url = "https://api.openai.com/v1/embeddings";
        let payload = serde_json::json!({
            "model": self.model,
            "input": inputs,
        });
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(anyhow!(
                "openai embeddings request failed (status {status}): {body}"
            ));
        }
        let parsed: OpenAiEmbeddingResponse = response.json()?;
        if parsed.data.len() != inputs.len() {
            return Err(anyhow!(
                "openai returned {} embeddings for {} inputs",
                parsed.data.len(),
                inputs.len()
            ));
        }
        Ok(parsed.data.into_iter().map(|data| data.embedding).collect())
    }
}

#[derive(Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}
