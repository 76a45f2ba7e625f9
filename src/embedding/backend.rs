//! fastembed-backed local embedding model.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fastembed::{InitOptions, TextEmbedding};

use super::model::{ModelSpec, resolve_model};
use super::{Embedder, EmbeddingError, ModelLoadError};
use crate::documents::Embedding;

/// A loaded fastembed model.
///
/// `TextEmbedding::embed` needs `&mut self`, so the model sits behind a
/// mutex to keep `Embedder` usable through a shared reference.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
    spec: ModelSpec,
}

impl std::fmt::Debug for FastEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedder")
            .field("model", &self.spec.name)
            .field("dimension", &self.spec.dimension)
            .finish()
    }
}

impl FastEmbedder {
    /// Resolve `model_name` and load it, downloading into `cache_dir` if needed.
    pub fn load(
        model_name: &str,
        cache_dir: &Path,
        show_download_progress: bool,
    ) -> Result<Self, ModelLoadError> {
        let spec = resolve_model(model_name)?;

        tracing::info!(
            target: "embedding",
            "loading model {} ({} dims) from {}",
            spec.name,
            spec.dimension,
            cache_dir.display()
        );

        let model = TextEmbedding::try_new(
            InitOptions::new(spec.model.clone())
                .with_cache_dir(PathBuf::from(cache_dir))
                .with_show_download_progress(show_download_progress),
        )
        .map_err(|e| ModelLoadError::Init {
            name: spec.name.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            model: Mutex::new(model),
            spec,
        })
    }
}

impl Embedder for FastEmbedder {
    fn model_name(&self) -> &str {
        self.spec.name
    }

    fn dimension(&self) -> usize {
        self.spec.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        let mut model = self.model.lock().map_err(|_| EmbeddingError::LockPoisoned)?;

        let embeddings = model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Generation(e.to_string()))?;

        if let Some(actual) = embeddings
            .iter()
            .map(Vec::len)
            .find(|&len| len != self.spec.dimension)
        {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.spec.dimension,
                actual,
            });
        }

        Ok(embeddings)
    }
}
