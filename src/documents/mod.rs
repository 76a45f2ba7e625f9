//! Document extraction and chunking.
//!
//! This module provides:
//! - Page-by-page PDF text extraction behind the `PageTextReader` capability
//! - Sentence-aware chunking with overlap stitching
//! - The document, chunk and record types shared by the pipeline

pub mod chunker;
pub mod config;
pub mod extract;
pub mod types;

pub use chunker::{Chunker, SentenceChunker, split_text_smart};
pub use config::ChunkingConfig;
pub use extract::{ExtractionError, PageTextReader, PdfPageReader, extract_document, extract_text};
pub use types::{Chunk, Document, Embedding, Page, RECORD_ID_PREFIX, StoredRecord, record_id};
