use once_cell::sync::OnceCell;
use tracing::debug;

use crate::corpus::Card;
use crate::embedding::EmbeddingClient;
use crate::error::{EngineError, Result};

const NORM_EPSILON: f32 = 1e-10;
const EMBED_BATCH: usize = 256;

/// Row-aligned matrix of unit-normalized card embeddings. Row `i`
/// always corresponds to card `i`; the two are never reordered
/// independently. The matrix is built lazily on first use and cached
/// for the lifetime of the index; a failed build leaves the cell
/// unset so a later call may retry.
pub struct EmbeddingIndex {
    cards: Vec<Card>,
    client: EmbeddingClient,
    matrix: OnceCell<Vec<Vec<f32>>>,
}

impl EmbeddingIndex {
    pub fn new(cards: Vec<Card>, client: EmbeddingClient) -> Self {
        Self {
            cards,
            client,
            matrix: OnceCell::new(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Idempotent. Embeds every card text in batched requests and
    /// normalizes each vector so dot product equals cosine
    /// similarity. Concurrent first calls are serialized by the
    /// once-cell: at most one build is in flight and other callers
    /// block on its completion.
    pub fn ensure_built(&self) -> Result<&[Vec<f32>]> {
        let matrix = self.matrix.get_or_try_init(|| {
            debug!(cards = self.cards.len(), "building embedding index");
            let texts: Vec<String> = self.cards.iter().map(|card| card.text.clone()).collect();
            let mut vectors = Vec::with_capacity(texts.len());
            for batch in texts.chunks(EMBED_BATCH) {
                let embedded = self
                    .client
                    .embed_batch(batch)
                    .map_err(|err| EngineError::EmbeddingService(err.to_string()))?;
                vectors.extend(embedded);
            }
            if vectors.len() != self.cards.len() {
                return Err(EngineError::EmbeddingService(format!(
                    "expected {} vectors, got {}",
                    self.cards.len(),
                    vectors.len()
                )));
            }
            for vector in &mut vectors {
                normalize(vector);
            }
            Ok(vectors)
        })?;
        Ok(matrix.as_slice())
    }

    /// Embeds and normalizes a single query string. Query vectors are
    /// not cached.
    pub fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = self
            .client
            .embed(text)
            .map_err(|err| EngineError::EmbeddingService(err.to_string()))?;
        normalize(&mut vector);
        Ok(vector)
    }
}

pub(crate) fn normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt() + NORM_EPSILON;
    for value in vector.iter_mut() {
        *value /= norm;
    }
}

pub(crate) fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
