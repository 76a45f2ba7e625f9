//! Core types for document extraction, chunking and storage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A fixed-length embedding vector.
pub type Embedding = Vec<f32>;

/// Prefix of every stored record id.
pub const RECORD_ID_PREFIX: &str = "chunk_";

/// Deterministic record id for the chunk at `index`.
///
/// Re-running the pipeline on the same document reproduces the same ids, so
/// the store overwrites instead of duplicating.
pub fn record_id(index: usize) -> String {
    format!("{RECORD_ID_PREFIX}{index}")
}

/// A single page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,

    /// Extracted text content.
    pub text: String,
}

impl Page {
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// A PDF document and its extracted pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Path the document was read from.
    pub path: PathBuf,

    /// Pages in document order.
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a document with no pages yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pages: Vec::new(),
        }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All page texts in order, each followed by a newline.
    pub fn full_text(&self) -> String {
        let capacity = self.pages.iter().map(|p| p.text.len() + 1).sum();
        self.pages
            .iter()
            .fold(String::with_capacity(capacity), |mut text, page| {
                text.push_str(&page.text);
                text.push('\n');
                text
            })
    }
}

/// A chunk of document text, the unit of embedding and storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position in the chunk sequence (0-based).
    pub index: usize,

    /// The chunk text, overlap included.
    pub text: String,
}

impl Chunk {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Id under which this chunk is stored.
    pub fn record_id(&self) -> String {
        record_id(self.index)
    }

    /// Length of the text in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Get a preview of the content (first N characters).
    pub fn preview(&self, max_chars: usize) -> &str {
        match self.text.char_indices().nth(max_chars) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }
}

/// A persisted (id, embedding, document) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: String,
    pub embedding: Embedding,
    pub document: String,
}
