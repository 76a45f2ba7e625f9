//! Vector store for chunk embeddings.
//!
//! Records are (id, embedding, document) triples written with upsert
//! semantics: an existing id is replaced, never duplicated.

pub mod memory;
pub mod metadata;
pub mod persistent;
pub mod schema;

pub use memory::MemoryVectorStore;
pub use metadata::{CollectionMetadata, SourceInfo, hash_bytes};
pub use persistent::TantivyVectorStore;
pub use schema::RecordSchema;

use tantivy::TantivyError;
use tantivy::directory::error::OpenDirectoryError;
use thiserror::Error;

use crate::documents::{Embedding, StoredRecord};

/// Errors from vector store operations.
#[derive(Error, Debug)]
pub enum StoreWriteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tantivy error: {0}")]
    Tantivy(#[from] TantivyError),

    #[error("Directory error: {0}")]
    Directory(#[from] OpenDirectoryError),

    #[error(
        "Upsert length mismatch: {ids} ids, {embeddings} embeddings, {documents} documents"
    )]
    LengthMismatch {
        ids: usize,
        embeddings: usize,
        documents: usize,
    },

    #[error("Dimension mismatch in collection '{collection}': expected {expected}, got {actual}")]
    DimensionMismatch {
        collection: String,
        expected: usize,
        actual: usize,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for vector store operations.
pub type StoreResult<T> = Result<T, StoreWriteError>;

/// A named, persistent collection of embedding records.
pub trait VectorStore {
    /// Name of the collection this store writes to.
    fn collection_name(&self) -> &str;

    /// Insert or replace records. Returns the number of records written.
    fn upsert(
        &mut self,
        ids: &[String],
        embeddings: &[Embedding],
        documents: &[String],
    ) -> StoreResult<usize>;

    /// Number of records currently stored.
    fn count(&self) -> StoreResult<usize>;

    /// Fetch a record by id.
    fn get(&self, id: &str) -> StoreResult<Option<StoredRecord>>;

    /// Remember which document and model produced the collection's records.
    fn record_source(&mut self, _source: &SourceInfo) -> StoreResult<()> {
        Ok(())
    }
}

/// Check an upsert batch and return its vector dimension.
///
/// All three sequences must have equal length and every embedding must match
/// `expected_dimension` when the collection already has one. An empty batch
/// has no dimension.
pub(crate) fn validate_batch(
    collection: &str,
    ids: &[String],
    embeddings: &[Embedding],
    documents: &[String],
    expected_dimension: Option<usize>,
) -> StoreResult<Option<usize>> {
    if ids.len() != embeddings.len() || ids.len() != documents.len() {
        return Err(StoreWriteError::LengthMismatch {
            ids: ids.len(),
            embeddings: embeddings.len(),
            documents: documents.len(),
        });
    }

    let Some(first) = embeddings.first() else {
        return Ok(None);
    };

    let expected = expected_dimension.unwrap_or(first.len());
    if let Some(bad) = embeddings.iter().find(|e| e.len() != expected) {
        return Err(StoreWriteError::DimensionMismatch {
            collection: collection.to_string(),
            expected,
            actual: bad.len(),
        });
    }

    Ok(Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(crate::documents::record_id).collect()
    }

    #[test]
    fn test_validate_batch_lengths() {
        let err = validate_batch("c", &ids(2), &[vec![0.0]], &["a".into(), "b".into()], None)
            .unwrap_err();
        assert!(matches!(
            err,
            StoreWriteError::LengthMismatch {
                ids: 2,
                embeddings: 1,
                documents: 2
            }
        ));
    }

    #[test]
    fn test_validate_batch_dimension() {
        let docs = vec!["a".to_string(), "b".to_string()];

        let dim = validate_batch("c", &ids(2), &[vec![0.0; 3], vec![1.0; 3]], &docs, None).unwrap();
        assert_eq!(dim, Some(3));

        let err = validate_batch("c", &ids(2), &[vec![0.0; 3], vec![1.0; 4]], &docs, None)
            .unwrap_err();
        assert!(matches!(err, StoreWriteError::DimensionMismatch { .. }));

        let err = validate_batch("c", &ids(2), &[vec![0.0; 3], vec![1.0; 3]], &docs, Some(384))
            .unwrap_err();
        assert!(err.to_string().contains("expected 384, got 3"));
    }

    #[test]
    fn test_validate_empty_batch() {
        assert_eq!(validate_batch("c", &[], &[], &[], Some(384)).unwrap(), None);
    }
}
