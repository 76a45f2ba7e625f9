//! Persistent vector store backed by a tantivy index.
//!
//! Each collection lives in its own directory under the database path:
//!
//! ```text
//! <db_path>/<collection>/
//!   meta.json, *.idx ...   tantivy segments
//!   collection.json        collection metadata
//! ```

use std::path::{Path, PathBuf};

use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::query::TermQuery;
use tantivy::schema::{IndexRecordOption, Value};
use tantivy::{
    Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument as Document, Term,
};

use super::metadata::{CollectionMetadata, SourceInfo};
use super::schema::RecordSchema;
use super::{StoreResult, StoreWriteError, VectorStore, validate_batch};
use crate::documents::{Embedding, StoredRecord};

/// Tantivy-backed collection of embedding records.
pub struct TantivyVectorStore {
    /// Collection directory.
    path: PathBuf,

    index: Index,

    reader: IndexReader,

    schema: RecordSchema,

    metadata: CollectionMetadata,

    /// Tantivy heap size in bytes.
    heap_size: usize,
}

impl std::fmt::Debug for TantivyVectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyVectorStore")
            .field("path", &self.path)
            .field("collection", &self.metadata.name)
            .field("dimension", &self.metadata.dimension)
            .finish()
    }
}

impl TantivyVectorStore {
    /// Open the named collection under `db_path`, creating it if needed.
    pub fn open(db_path: impl AsRef<Path>, collection_name: &str) -> StoreResult<Self> {
        let path = db_path.as_ref().join(collection_name);
        std::fs::create_dir_all(&path)?;

        let existing = path.join("meta.json").exists();
        let index = if existing {
            Index::open_in_dir(&path)?
        } else {
            let (tantivy_schema, _) = RecordSchema::build();
            let dir = MmapDirectory::open(&path)?;
            Index::create(dir, tantivy_schema, IndexSettings::default())?
        };

        let metadata = match CollectionMetadata::load(&path)? {
            Some(metadata) => metadata,
            None => {
                let metadata = CollectionMetadata::new(collection_name);
                metadata.save(&path)?;
                metadata
            }
        };

        tracing::debug!(
            target: "store",
            "opened collection '{collection_name}' at {} ({})",
            path.display(),
            if existing { "existing" } else { "new" }
        );

        Self::with_index(path, index, metadata)
    }

    /// Open an existing collection without writing anything to disk.
    ///
    /// Returns `None` when the collection directory holds no index. A
    /// missing `collection.json` yields fresh metadata that is kept in
    /// memory only.
    pub fn open_existing(
        db_path: impl AsRef<Path>,
        collection_name: &str,
    ) -> StoreResult<Option<Self>> {
        let path = db_path.as_ref().join(collection_name);
        if !path.join("meta.json").exists() {
            return Ok(None);
        }

        let index = Index::open_in_dir(&path)?;
        let metadata = CollectionMetadata::load(&path)?
            .unwrap_or_else(|| CollectionMetadata::new(collection_name));

        Self::with_index(path, index, metadata).map(Some)
    }

    fn with_index(
        path: PathBuf,
        index: Index,
        metadata: CollectionMetadata,
    ) -> StoreResult<Self> {
        let (_, schema) = RecordSchema::build();

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        reader.reload()?;

        Ok(Self {
            path,
            index,
            reader,
            schema,
            metadata,
            heap_size: 50_000_000,
        })
    }

    /// Collection directory on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Metadata recorded for this collection.
    pub fn metadata(&self) -> &CollectionMetadata {
        &self.metadata
    }

    fn find_doc(&self, id: &str) -> StoreResult<Option<Document>> {
        let searcher = self.reader.searcher();
        let term = Term::from_field_text(self.schema.record_id, id);
        let query = TermQuery::new(term, IndexRecordOption::Basic);

        let top_docs = searcher.search(&query, &TopDocs::with_limit(1))?;
        match top_docs.first() {
            Some((_score, address)) => Ok(Some(searcher.doc(*address)?)),
            None => Ok(None),
        }
    }

    fn to_record(&self, id: &str, doc: &Document) -> StoreResult<StoredRecord> {
        let embedding_json = doc
            .get_first(self.schema.embedding)
            .and_then(|v| v.as_str())
            .unwrap_or("[]");
        let embedding: Embedding = serde_json::from_str(embedding_json).map_err(|e| {
            StoreWriteError::Serialization(format!("embedding for '{id}': {e}"))
        })?;

        let document = doc
            .get_first(self.schema.document)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        Ok(StoredRecord {
            id: id.to_string(),
            embedding,
            document,
        })
    }
}

impl VectorStore for TantivyVectorStore {
    fn collection_name(&self) -> &str {
        &self.metadata.name
    }

    fn upsert(
        &mut self,
        ids: &[String],
        embeddings: &[Embedding],
        documents: &[String],
    ) -> StoreResult<usize> {
        let Some(dimension) = validate_batch(
            &self.metadata.name,
            ids,
            embeddings,
            documents,
            self.metadata.dimension,
        )?
        else {
            return Ok(0);
        };

        let mut writer: IndexWriter<Document> = self.index.writer(self.heap_size)?;
        let indexed_at = chrono::Utc::now().timestamp().max(0) as u64;

        for ((id, embedding), text) in ids.iter().zip(embeddings).zip(documents) {
            // Deletes only see earlier operations, so the add below survives
            writer.delete_term(Term::from_field_text(self.schema.record_id, id));

            let embedding_json = serde_json::to_string(embedding)
                .map_err(|e| StoreWriteError::Serialization(e.to_string()))?;

            let mut doc = Document::new();
            doc.add_text(self.schema.record_id, id);
            doc.add_text(self.schema.document, text);
            doc.add_text(self.schema.embedding, &embedding_json);
            doc.add_u64(self.schema.indexed_at, indexed_at);
            writer.add_document(doc)?;
        }

        writer.commit()?;
        self.reader.reload()?;

        self.metadata.dimension = Some(dimension);
        self.metadata.touch();
        self.metadata.save(&self.path)?;

        tracing::debug!(
            target: "store",
            "upserted {} records into '{}'",
            ids.len(),
            self.metadata.name
        );

        Ok(ids.len())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.reader.searcher().num_docs() as usize)
    }

    fn get(&self, id: &str) -> StoreResult<Option<StoredRecord>> {
        match self.find_doc(id)? {
            Some(doc) => self.to_record(id, &doc).map(Some),
            None => Ok(None),
        }
    }

    fn record_source(&mut self, source: &SourceInfo) -> StoreResult<()> {
        self.metadata.source = Some(source.clone());
        self.metadata.touch();
        self.metadata.save(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::record_id;
    use crate::store::metadata::METADATA_FILE;
    use tempfile::TempDir;

    fn batch(texts: &[&str], dimension: usize) -> (Vec<String>, Vec<Embedding>, Vec<String>) {
        let ids = (0..texts.len()).map(record_id).collect();
        let embeddings = (0..texts.len())
            .map(|i| vec![i as f32; dimension])
            .collect();
        let documents = texts.iter().map(|t| t.to_string()).collect();
        (ids, embeddings, documents)
    }

    #[test]
    fn test_open_creates_collection_dir() {
        let dir = TempDir::new().unwrap();
        let store = TantivyVectorStore::open(dir.path(), "pdf_collection").unwrap();

        assert_eq!(store.collection_name(), "pdf_collection");
        assert!(dir.path().join("pdf_collection").join("meta.json").exists());
        assert!(dir.path().join("pdf_collection").join("collection.json").exists());
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let dir = TempDir::new().unwrap();
        let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();

        let (ids, embeddings, documents) = batch(&["first chunk", "second chunk"], 3);
        assert_eq!(store.upsert(&ids, &embeddings, &documents).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);

        let record = store.get("chunk_1").unwrap().unwrap();
        assert_eq!(record.document, "second chunk");
        assert_eq!(record.embedding, vec![1.0, 1.0, 1.0]);
        assert!(store.get("chunk_9").unwrap().is_none());
    }

    #[test]
    fn test_upsert_twice_does_not_duplicate() {
        let dir = TempDir::new().unwrap();
        let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();

        let (ids, embeddings, documents) = batch(&["a", "b", "c"], 2);
        store.upsert(&ids, &embeddings, &documents).unwrap();
        store
            .upsert(&ids, &embeddings, &["x".into(), "y".into(), "z".into()])
            .unwrap();

        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.get("chunk_0").unwrap().unwrap().document, "x");
    }

    #[test]
    fn test_records_persist_across_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();
            let (ids, embeddings, documents) = batch(&["kept"], 4);
            store.upsert(&ids, &embeddings, &documents).unwrap();
        }

        let store = TantivyVectorStore::open_existing(dir.path(), "c")
            .unwrap()
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.metadata().dimension, Some(4));
        assert_eq!(store.get("chunk_0").unwrap().unwrap().document, "kept");
    }

    #[test]
    fn test_open_existing_missing_collection() {
        let dir = TempDir::new().unwrap();
        assert!(
            TantivyVectorStore::open_existing(dir.path(), "nope")
                .unwrap()
                .is_none()
        );
        assert!(!dir.path().join("nope").exists());
    }

    #[test]
    fn test_open_existing_does_not_write_metadata() {
        let dir = TempDir::new().unwrap();
        {
            let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();
            let (ids, embeddings, documents) = batch(&["a"], 2);
            store.upsert(&ids, &embeddings, &documents).unwrap();
        }
        let metadata_path = dir.path().join("c").join(METADATA_FILE);
        std::fs::remove_file(&metadata_path).unwrap();

        let store = TantivyVectorStore::open_existing(dir.path(), "c")
            .unwrap()
            .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(store.metadata().name, "c");
        assert!(!metadata_path.exists());
    }

    #[test]
    fn test_concurrent_writer_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();
        let (ids, embeddings, documents) = batch(&["a"], 2);

        let other = Index::open_in_dir(dir.path().join("c")).unwrap();
        let held: IndexWriter<Document> = other.writer_with_num_threads(1, 15_000_000).unwrap();

        let err = store.upsert(&ids, &embeddings, &documents).unwrap_err();
        assert!(matches!(err, StoreWriteError::Tantivy(_)), "{err}");
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.metadata().dimension, None);

        drop(held);
        assert_eq!(store.upsert(&ids, &embeddings, &documents).unwrap(), 1);
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_dimension_fixed_by_first_upsert() {
        let dir = TempDir::new().unwrap();
        let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();

        let (ids, embeddings, documents) = batch(&["a"], 3);
        store.upsert(&ids, &embeddings, &documents).unwrap();

        let (ids, embeddings, documents) = batch(&["b"], 5);
        let err = store.upsert(&ids, &embeddings, &documents).unwrap_err();
        assert!(matches!(
            err,
            StoreWriteError::DimensionMismatch {
                expected: 3,
                actual: 5,
                ..
            }
        ));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_empty_upsert_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();

        assert_eq!(store.upsert(&[], &[], &[]).unwrap(), 0);
        assert_eq!(store.count().unwrap(), 0);
        assert_eq!(store.metadata().dimension, None);
    }

    #[test]
    fn test_record_source_persists() {
        let dir = TempDir::new().unwrap();
        let source = SourceInfo {
            path: PathBuf::from("report.pdf"),
            content_hash: None,
            model_name: "all-MiniLM-L6-v2".to_string(),
            page_count: 2,
            chunk_count: 5,
        };
        {
            let mut store = TantivyVectorStore::open(dir.path(), "c").unwrap();
            store.record_source(&source).unwrap();
        }

        let store = TantivyVectorStore::open(dir.path(), "c").unwrap();
        assert_eq!(store.metadata().source.as_ref(), Some(&source));
    }
}
