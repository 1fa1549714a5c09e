use std::collections::BTreeMap;
use tracing::debug;

use crate::corpus::{load_cards, Card};
use crate::embedding::EmbeddingClient;
use crate::error::{EngineError, Result};
use crate::index::{dot, EmbeddingIndex};

/// Per-mode score multipliers keyed by pack name. Packs absent from
/// the table score at 1.0.
#[derive(Debug, Clone, Default)]
pub struct PackBias {
    multipliers: BTreeMap<String, f32>,
}

impl PackBias {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        let mut multipliers = BTreeMap::new();
        for (pack, multiplier) in entries {
            let pack = pack.into();
            if !multiplier.is_finite() || multiplier <= 0.0 {
                return Err(EngineError::InvalidPackBias(format!(
                    "multiplier for `{pack}` must be a positive number, got {multiplier}"
                )));
            }
            multipliers.insert(pack, multiplier);
        }
        Ok(Self { multipliers })
    }

    pub fn multiplier_for(&self, pack: &str) -> f32 {
        self.multipliers.get(pack).copied().unwrap_or(1.0)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, f32)> {
        self.multipliers
            .iter()
            .map(|(pack, multiplier)| (pack.as_str(), *multiplier))
    }
}

#[derive(Debug, Clone)]
pub struct ScoredHit {
    pub card: Card,
    pub score: f32,
}

/// Ranks canon cards against a query by weighted cosine similarity.
/// Read-only after the one-time lazy index build, so a shared
/// instance can serve concurrent queries.
pub struct Retriever {
    index: EmbeddingIndex,
}

impl Retriever {
    pub fn from_path<P: AsRef<std::path::Path>>(path: P, client: EmbeddingClient) -> Result<Self> {
        let cards = load_cards(path)?;
        Ok(Self::new(cards, client))
    }

    pub fn new(cards: Vec<Card>, client: EmbeddingClient) -> Self {
        Self {
            index: EmbeddingIndex::new(cards, client),
        }
    }

    pub fn cards(&self) -> &[Card] {
        self.index.cards()
    }

    pub fn ensure_built(&self) -> Result<()> {
        self.index.ensure_built()?;
        Ok(())
    }

    /// Returns at most `top_k` hits in descending score order, ties
    /// broken by corpus order. Deterministic for identical inputs.
    /// A `top_k` larger than the corpus returns every card.
    pub fn retrieve(&self, query: &str, top_k: usize, bias: &PackBias) -> Result<Vec<ScoredHit>> {
        let matrix = self.index.ensure_built()?;
        let query_vector = self.index.embed_query(query)?;
        let hits = rank(&query_vector, matrix, self.index.cards(), top_k, bias);
        debug!(top_k, hits = hits.len(), "retrieval complete");
        Ok(hits)
    }
}

fn rank(
    query: &[f32],
    matrix: &[Vec<f32>],
    cards: &[Card],
    top_k: usize,
    bias: &PackBias,
) -> Vec<ScoredHit> {
    let mut scored: Vec<(usize, f32)> = cards
        .iter()
        .enumerate()
        .map(|(idx, card)| {
            let similarity = dot(query, &matrix[idx]);
            let score = similarity * card.weight * bias.multiplier_for(&card.pack);
            (idx, score)
        })
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.cmp(&b.0))
    });
    scored.truncate(top_k.min(cards.len()));
    scored
        .into_iter()
        .map(|(idx, score)| ScoredHit {
            card: cards[idx].clone(),
            score,
        })
        .collect()
}
