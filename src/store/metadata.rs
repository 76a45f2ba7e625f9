//! Collection metadata persisted next to the record index.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{StoreResult, StoreWriteError};

/// File name of the metadata sidecar inside a collection directory.
pub const METADATA_FILE: &str = "collection.json";

/// Provenance of the records written in one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source document path.
    pub path: PathBuf,

    /// Hex SHA-256 of the source bytes, when known.
    pub content_hash: Option<String>,

    /// Embedding model used for the records.
    pub model_name: String,

    /// Number of pages extracted.
    pub page_count: usize,

    /// Number of chunks written.
    pub chunk_count: usize,
}

/// Metadata describing a collection on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    /// Collection name.
    pub name: String,

    /// Vector dimension, fixed by the first non-empty upsert.
    pub dimension: Option<usize>,

    /// Last source written into the collection.
    pub source: Option<SourceInfo>,

    /// RFC 3339 creation time.
    pub created_at: String,

    /// RFC 3339 time of the last write.
    pub updated_at: String,
}

impl CollectionMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            name: name.into(),
            dimension: None,
            source: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Mark the metadata as written now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Load metadata from a collection directory, if present.
    pub fn load(dir: &Path) -> StoreResult<Option<Self>> {
        let path = dir.join(METADATA_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let metadata = serde_json::from_str(&content).map_err(|e| {
            StoreWriteError::Serialization(format!("{}: {e}", path.display()))
        })?;
        Ok(Some(metadata))
    }

    /// Write metadata into a collection directory.
    pub fn save(&self, dir: &Path) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StoreWriteError::Serialization(e.to_string()))?;
        std::fs::write(dir.join(METADATA_FILE), content)?;
        Ok(())
    }
}

/// Hex SHA-256 of a byte slice.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_hash_is_deterministic_hex() {
        let a = hash_bytes(b"%PDF-1.4");
        assert_eq!(a, hash_bytes(b"%PDF-1.4"));
        assert_ne!(a, hash_bytes(b"%PDF-1.5"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(CollectionMetadata::load(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut metadata = CollectionMetadata::new("pdf_collection");
        metadata.dimension = Some(384);
        metadata.source = Some(SourceInfo {
            path: PathBuf::from("paper.pdf"),
            content_hash: Some(hash_bytes(b"paper")),
            model_name: "all-MiniLM-L6-v2".to_string(),
            page_count: 3,
            chunk_count: 12,
        });
        metadata.save(dir.path()).unwrap();

        let loaded = CollectionMetadata::load(dir.path()).unwrap().unwrap();
        assert_eq!(loaded, metadata);
    }

    #[test]
    fn test_corrupt_metadata_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(METADATA_FILE), "{not json").unwrap();

        let err = CollectionMetadata::load(dir.path()).unwrap_err();
        assert!(matches!(err, StoreWriteError::Serialization(_)));
    }
}
