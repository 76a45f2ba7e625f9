//! Embedding generation for document chunks.
//!
//! The loaded model is an explicit `Embedder` value handed to
//! [`generate_embeddings`]; nothing here holds process-wide state.

mod backend;
pub mod model;

pub use backend::FastEmbedder;
pub use model::{ModelSpec, resolve_model, supported_models};

use thiserror::Error;

use crate::documents::{Chunk, Embedding};

/// Default number of chunks sent to the model per call.
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// The named model could not be loaded.
#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("Unknown embedding model '{name}'. Supported models: {supported}")]
    UnknownModel { name: String, supported: String },

    #[error("Failed to initialize embedding model '{name}': {reason}")]
    Init { name: String, reason: String },
}

/// A loaded model failed while embedding.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Failed to generate embeddings: {0}")]
    Generation(String),

    #[error("Expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// A loaded embedding model.
pub trait Embedder: Send + Sync {
    /// Canonical name of the loaded model.
    fn model_name(&self) -> &str;

    /// Dimension of every vector this model produces.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts, returning one vector per input (in order).
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError>;
}

/// Embed `chunks` in batches, preserving order.
///
/// `on_progress` receives `(embedded_so_far, total)` after every batch.
pub fn generate_embeddings<F>(
    embedder: &dyn Embedder,
    chunks: &[Chunk],
    batch_size: usize,
    mut on_progress: F,
) -> Result<Vec<Embedding>, EmbeddingError>
where
    F: FnMut(usize, usize),
{
    let total = chunks.len();
    let mut embeddings = Vec::with_capacity(total);

    for batch in chunks.chunks(batch_size.max(1)) {
        let texts: Vec<&str> = batch.iter().map(|chunk| chunk.text.as_str()).collect();
        let batch_embeddings = embedder.embed_batch(&texts)?;

        if batch_embeddings.len() != batch.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: batch.len(),
                actual: batch_embeddings.len(),
            });
        }

        embeddings.extend(batch_embeddings);
        on_progress(embeddings.len(), total);
    }

    tracing::debug!(
        target: "embedding",
        "generated {} embeddings with {}",
        embeddings.len(),
        embedder.model_name()
    );

    Ok(embeddings)
}
