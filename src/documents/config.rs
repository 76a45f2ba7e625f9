//! Configuration types for document chunking.

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Configuration for sentence-aware chunking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target maximum characters per chunk before overlap stitching.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of trailing context carried into the next chunk.
    #[serde(default = "default_overlap")]
    pub overlap: usize,
}

pub(crate) fn default_chunk_size() -> usize {
    500
}

pub(crate) fn default_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    /// Validate configuration values.
    ///
    /// An overlap at or above the chunk size is accepted; the resulting chunks
    /// are dominated by repeated context, which is only worth a warning.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.chunk_size == 0 {
            return Err(ConfigurationError::ZeroChunkSize);
        }

        if self.overlap >= self.chunk_size {
            tracing::warn!(
                target: "chunker",
                "overlap ({}) >= chunk_size ({}): chunks will repeat most of their predecessor",
                self.overlap,
                self.chunk_size
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunking_config_defaults() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.overlap, 50);
    }

    #[test]
    fn test_chunking_config_validation() {
        assert!(ChunkingConfig::default().validate().is_ok());
        assert_eq!(
            ChunkingConfig::new(0, 0).validate(),
            Err(ConfigurationError::ZeroChunkSize)
        );
        // Large overlap is degenerate but allowed
        assert!(ChunkingConfig::new(10, 20).validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: ChunkingConfig = toml::from_str("chunk_size = 800").unwrap();
        assert_eq!(config.chunk_size, 800);
        assert_eq!(config.overlap, 50);
    }
}
