use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two sequential completion calls failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStage {
    Opinion,
    Critique,
}

impl CompletionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompletionStage::Opinion => "opinion",
            CompletionStage::Critique => "critique",
        }
    }
}

impl fmt::Display for CompletionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("canon corpus not found: {0:?}")]
    CorpusNotFound(PathBuf),
    #[error("bad corpus record at line {line}: {reason}")]
    CorpusFormat { line: usize, reason: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid pack bias: {0}")]
    InvalidPackBias(String),
    #[error("embedding service error: {0}")]
    EmbeddingService(String),
    #[error("completion service error in {stage} stage: {source}")]
    CompletionService {
        stage: CompletionStage,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
