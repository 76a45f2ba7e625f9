//! In-memory vector store, used for dry runs and tests.

use std::collections::BTreeMap;

use super::metadata::SourceInfo;
use super::{StoreResult, VectorStore, validate_batch};
use crate::documents::{Embedding, StoredRecord};

/// A collection held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryVectorStore {
    name: String,
    records: BTreeMap<String, StoredRecord>,
    dimension: Option<usize>,
    source: Option<SourceInfo>,
}

impl MemoryVectorStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    pub fn source(&self) -> Option<&SourceInfo> {
        self.source.as_ref()
    }
}

impl VectorStore for MemoryVectorStore {
    fn collection_name(&self) -> &str {
        &self.name
    }

    fn upsert(
        &mut self,
        ids: &[String],
        embeddings: &[Embedding],
        documents: &[String],
    ) -> StoreResult<usize> {
        let Some(dimension) = validate_batch(&self.name, ids, embeddings, documents, self.dimension)?
        else {
            return Ok(0);
        };

        for ((id, embedding), document) in ids.iter().zip(embeddings).zip(documents) {
            self.records.insert(
                id.clone(),
                StoredRecord {
                    id: id.clone(),
                    embedding: embedding.clone(),
                    document: document.clone(),
                },
            );
        }
        self.dimension = Some(dimension);

        Ok(ids.len())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.records.len())
    }

    fn get(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        Ok(self.records.get(id).cloned())
    }

    fn record_source(&mut self, source: &SourceInfo) -> StoreResult<()> {
        self.source = Some(source.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreWriteError;

    #[test]
    fn test_upsert_replaces_by_id() {
        let mut store = MemoryVectorStore::new("mem");
        let ids = vec!["chunk_0".to_string(), "chunk_1".to_string()];

        store
            .upsert(&ids, &[vec![0.0], vec![1.0]], &["a".into(), "b".into()])
            .unwrap();
        store
            .upsert(&ids[..1], &[vec![5.0]], &["A".into()])
            .unwrap();

        assert_eq!(store.count().unwrap(), 2);
        let record = store.get("chunk_0").unwrap().unwrap();
        assert_eq!(record.document, "A");
        assert_eq!(record.embedding, vec![5.0]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut store = MemoryVectorStore::new("mem");
        let err = store
            .upsert(&["chunk_0".to_string()], &[], &["a".into()])
            .unwrap_err();

        assert!(matches!(err, StoreWriteError::LengthMismatch { .. }));
        assert_eq!(store.count().unwrap(), 0);
    }
}
