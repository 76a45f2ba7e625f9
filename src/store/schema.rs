//! Tantivy schema for embedding records.

use tantivy::schema::{Field, STORED, STRING, Schema, SchemaBuilder};

/// Schema fields for a stored record.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Record id (`chunk_<n>`), exact-match indexed for upsert deletes.
    pub record_id: Field,

    /// Chunk text.
    pub document: Field,

    /// Embedding as a JSON array of floats.
    pub embedding: Field,

    /// Timestamp when written (UTC seconds).
    pub indexed_at: Field,
}

impl RecordSchema {
    /// Build the schema for record storage.
    pub fn build() -> (Schema, Self) {
        let mut builder = SchemaBuilder::default();

        let record_id = builder.add_text_field("record_id", STRING | STORED);
        let document = builder.add_text_field("document", STORED);
        let embedding = builder.add_text_field("embedding", STORED);
        let indexed_at = builder.add_u64_field("indexed_at", STORED);

        let schema = builder.build();

        (
            schema,
            Self {
                record_id,
                document,
                embedding,
                indexed_at,
            },
        )
    }
}
