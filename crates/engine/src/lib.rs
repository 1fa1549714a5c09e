pub mod context;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod retriever;

pub use context::{assemble, ExternalDoc, EXTERNAL_PACK};
pub use corpus::{load_cards, Card, CardMeta, DEFAULT_CARD_WEIGHT};
pub use embedding::{
    EmbeddingBackend, EmbeddingClient, HashEmbedder, OpenAiEmbeddingClient,
    DEFAULT_HASH_DIMENSIONS, DEFAULT_OPENAI_EMBEDDING_MODEL,
};
pub use error::{CompletionStage, EngineError, Result};
pub use index::EmbeddingIndex;
pub use pipeline::{analyze, AnalysisMetrics, AnalysisRequest, AnalysisResult};
pub use retriever::{PackBias, Retriever, ScoredHit};
pub use canon_llm::{ChatMessage, LlmClient, LlmProvider, LlmRequest, LlmResponse, Role};
