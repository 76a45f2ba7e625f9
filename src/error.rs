//! Error taxonomy for the ingestion pipeline.
//!
//! Each collaborator owns its error type; `PipelineError` is the union the
//! orchestrator captures when a stage fails.

use thiserror::Error;

pub use crate::documents::ExtractionError;
pub use crate::embedding::{EmbeddingError, ModelLoadError};
pub use crate::store::StoreWriteError;

/// Invalid configuration detected before any stage runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("chunk_size must be greater than zero")]
    ZeroChunkSize,

    #[error("embedding_batch_size must be greater than zero")]
    ZeroBatchSize,

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

/// Any failure that aborts a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    ModelLoad(#[from] ModelLoadError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    StoreWrite(#[from] StoreWriteError),

    #[error("Stage invariant violated: {0}")]
    Invariant(String),
}

impl PipelineError {
    /// Short machine-friendly label for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Extraction(_) => "extraction",
            Self::ModelLoad(_) => "model_load",
            Self::Embedding(_) => "embedding",
            Self::StoreWrite(_) => "store_write",
            Self::Invariant(_) => "invariant",
        }
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_messages() {
        assert_eq!(
            ConfigurationError::ZeroChunkSize.to_string(),
            "chunk_size must be greater than zero"
        );
        assert_eq!(
            ConfigurationError::Empty {
                field: "model_name"
            }
            .to_string(),
            "model_name must not be empty"
        );
    }

    #[test]
    fn test_pipeline_error_kind() {
        let err: PipelineError = ConfigurationError::ZeroChunkSize.into();
        assert_eq!(err.kind(), "configuration");
        assert_eq!(err.to_string(), "chunk_size must be greater than zero");
    }
}
