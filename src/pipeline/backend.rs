//! Collaborator factories used by the pipeline.
//!
//! The pipeline never names lopdf, fastembed or tantivy directly. It asks a
//! [`PipelineBackend`] for a page reader, an embedder and a store, so tests can
//! hand it fakes.

use std::path::{Path, PathBuf};

use crate::config::{EmbeddingConfig, default_models_dir};
use crate::documents::{ExtractionError, PageTextReader, PdfPageReader};
use crate::embedding::{Embedder, FastEmbedder, ModelLoadError};
use crate::store::{MemoryVectorStore, StoreWriteError, TantivyVectorStore, VectorStore};

/// Opens the external resources a run depends on.
pub trait PipelineBackend {
    /// Open a document for page-by-page reading.
    fn open_document(&self, path: &Path) -> Result<Box<dyn PageTextReader>, ExtractionError>;

    /// Load the named embedding model.
    fn load_embedder(&self, model_name: &str) -> Result<Box<dyn Embedder>, ModelLoadError>;

    /// Open (or create) a collection.
    fn open_store(
        &self,
        db_path: &Path,
        collection_name: &str,
    ) -> Result<Box<dyn VectorStore>, StoreWriteError>;
}

/// Backend using lopdf, fastembed and tantivy.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    models_dir: PathBuf,
    show_download_progress: bool,
    in_memory_store: bool,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            show_download_progress: true,
            in_memory_store: false,
        }
    }
}

impl LocalBackend {
    pub fn new(embedding: &EmbeddingConfig) -> Self {
        Self {
            models_dir: embedding.models_dir(),
            show_download_progress: embedding.show_download_progress,
            in_memory_store: false,
        }
    }

    /// Write records to a throwaway in-memory collection instead of disk.
    pub fn with_in_memory_store(mut self, in_memory: bool) -> Self {
        self.in_memory_store = in_memory;
        self
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }
}

impl PipelineBackend for LocalBackend {
    fn open_document(&self, path: &Path) -> Result<Box<dyn PageTextReader>, ExtractionError> {
        Ok(Box::new(PdfPageReader::open(path)?))
    }

    fn load_embedder(&self, model_name: &str) -> Result<Box<dyn Embedder>, ModelLoadError> {
        let embedder = FastEmbedder::load(model_name, &self.models_dir, self.show_download_progress)?;
        Ok(Box::new(embedder))
    }

    fn open_store(
        &self,
        db_path: &Path,
        collection_name: &str,
    ) -> Result<Box<dyn VectorStore>, StoreWriteError> {
        if self.in_memory_store {
            return Ok(Box::new(MemoryVectorStore::new(collection_name)));
        }
        Ok(Box::new(TantivyVectorStore::open(db_path, collection_name)?))
    }
}
