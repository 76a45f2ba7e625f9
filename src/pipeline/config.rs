//! Pipeline configuration
//!
//! The parameters one run needs, read from Settings (.pdfmind/settings.toml)
//! with CLI overrides applied by the caller.

use std::path::PathBuf;

use crate::Settings;
use crate::documents::ChunkingConfig;
use crate::error::ConfigurationError;

/// Configuration for a single pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Embedding model to load
    pub model_name: String,

    /// Chunk size and overlap
    pub chunking: ChunkingConfig,

    /// Chunks per embedding call
    pub batch_size: usize,

    /// Location of the persistent vector store
    pub db_path: PathBuf,

    /// Collection records are written to
    pub collection_name: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl PipelineConfig {
    /// Create config from Settings.
    ///
    /// - `processing.model_name` -> model_name
    /// - `processing.chunk_size`, `processing.overlap` -> chunking
    /// - `processing.embedding_batch_size` -> batch_size
    /// - `store.db_path` -> db_path
    /// - `store.collection_name` -> collection_name
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model_name: settings.processing.model_name.clone(),
            chunking: settings.processing.chunking(),
            batch_size: settings.processing.embedding_batch_size,
            db_path: settings.store.db_path.clone(),
            collection_name: settings.store.collection_name.clone(),
        }
    }

    /// Reject values no run can succeed with.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.model_name.trim().is_empty() {
            return Err(ConfigurationError::Empty {
                field: "model_name",
            });
        }
        if self.collection_name.trim().is_empty() {
            return Err(ConfigurationError::Empty {
                field: "collection_name",
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigurationError::ZeroBatchSize);
        }
        self.chunking.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_settings() {
        let config = PipelineConfig::default();
        assert_eq!(config.model_name, "all-MiniLM-L6-v2");
        assert_eq!(config.chunking, ChunkingConfig::new(500, 50));
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.db_path, PathBuf::from("./chroma_db"));
        assert_eq!(config.collection_name, "pdf_collection");
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.processing.chunk_size = 256;
        settings.processing.overlap = 0;
        settings.store.collection_name = "papers".to_string();

        let config = PipelineConfig::from_settings(&settings);
        assert_eq!(config.chunking, ChunkingConfig::new(256, 0));
        assert_eq!(config.collection_name, "papers");
    }

    #[test]
    fn test_validate() {
        assert!(PipelineConfig::default().validate().is_ok());

        let config = PipelineConfig {
            chunking: ChunkingConfig::new(0, 0),
            ..PipelineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigurationError::ZeroChunkSize));

        let config = PipelineConfig {
            model_name: String::new(),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::Empty { field: "model_name" })
        ));
    }
}
