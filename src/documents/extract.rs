//! PDF text extraction.
//!
//! Pages are read one at a time through the `PageTextReader` capability. The
//! first page that fails aborts the whole document; there is no partial
//! recovery.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::{Document, Page};

/// Errors raised while reading text out of a PDF.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse PDF {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Failed to extract text from page {page}: {reason}")]
    Page { page: u32, reason: String },
}

/// Page-level text access for an opened document.
pub trait PageTextReader {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text of a single page (1-based).
    fn page_text(&self, page_number: u32) -> Result<String, ExtractionError>;

    /// Hex SHA-256 of the source bytes, when known.
    fn content_hash(&self) -> Option<String> {
        None
    }
}

/// `lopdf`-backed reader.
pub struct PdfPageReader {
    path: PathBuf,
    document: lopdf::Document,
    page_numbers: Vec<u32>,
    content_hash: String,
}

impl std::fmt::Debug for PdfPageReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfPageReader")
            .field("path", &self.path)
            .field("page_count", &self.page_numbers.len())
            .field("content_hash", &self.content_hash)
            .finish()
    }
}

impl PdfPageReader {
    /// Open and parse a PDF file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let path = path.as_ref().to_path_buf();
        let bytes = std::fs::read(&path).map_err(|source| ExtractionError::Io {
            path: path.clone(),
            source,
        })?;

        Self::from_bytes(path, &bytes)
    }

    /// Parse a PDF already held in memory. `path` is only used for messages.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: &[u8]) -> Result<Self, ExtractionError> {
        let path = path.into();
        let document = lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Parse {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        // get_pages is keyed by page number, already in order
        let page_numbers = document.get_pages().keys().copied().collect();

        Ok(Self {
            path,
            document,
            page_numbers,
            content_hash: crate::store::hash_bytes(bytes),
        })
    }
}

impl PageTextReader for PdfPageReader {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_text(&self, page_number: u32) -> Result<String, ExtractionError> {
        let Some(&page) = self.page_numbers.get(page_number.saturating_sub(1) as usize) else {
            return Err(ExtractionError::Page {
                page: page_number,
                reason: format!("document has {} pages", self.page_numbers.len()),
            });
        };

        self.document
            .extract_text(&[page])
            .map_err(|e| ExtractionError::Page {
                page: page_number,
                reason: e.to_string(),
            })
    }

    fn content_hash(&self) -> Option<String> {
        Some(self.content_hash.clone())
    }
}

/// Read every page of `reader` into a [`Document`].
pub fn extract_document(
    path: impl AsRef<Path>,
    reader: &dyn PageTextReader,
) -> Result<Document, ExtractionError> {
    let mut document = Document::new(path);
    let page_count = reader.page_count();

    for number in 1..=page_count {
        let text = reader.page_text(number)?;
        tracing::trace!(target: "extract", "page {number}/{page_count}: {} chars", text.len());
        document.pages.push(Page::new(number, text));
    }

    tracing::debug!(
        target: "extract",
        "extracted {} pages from {}",
        document.page_count(),
        document.path.display()
    );

    Ok(document)
}

/// Extract the full text of a document, one trailing newline per page.
pub fn extract_text(
    path: impl AsRef<Path>,
    reader: &dyn PageTextReader,
) -> Result<String, ExtractionError> {
    extract_document(path, reader).map(|document| document.full_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakePages {
        pages: Vec<Result<&'static str, &'static str>>,
    }

    impl PageTextReader for FakePages {
        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_text(&self, page_number: u32) -> Result<String, ExtractionError> {
            match self.pages[(page_number - 1) as usize] {
                Ok(text) => Ok(text.to_string()),
                Err(reason) => Err(ExtractionError::Page {
                    page: page_number,
                    reason: reason.to_string(),
                }),
            }
        }
    }

    #[test]
    fn test_pages_concatenated_with_trailing_newlines() {
        let reader = FakePages {
            pages: vec![Ok("Page one."), Ok("Page two."), Ok("")],
        };

        let text = extract_text("doc.pdf", &reader).unwrap();
        assert_eq!(text, "Page one.\nPage two.\n\n");
    }

    #[test]
    fn test_page_numbers_are_one_based() {
        let reader = FakePages {
            pages: vec![Ok("a"), Ok("b")],
        };

        let document = extract_document("doc.pdf", &reader).unwrap();
        let numbers: Vec<u32> = document.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_failing_page_aborts_extraction() {
        let reader = FakePages {
            pages: vec![Ok("fine"), Err("corrupt stream"), Ok("never read")],
        };

        let err = extract_text("doc.pdf", &reader).unwrap_err();
        assert!(matches!(err, ExtractionError::Page { page: 2, .. }));
        assert!(err.to_string().contains("corrupt stream"));
    }

    #[test]
    fn test_open_missing_file() {
        let err = PdfPageReader::open("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::Io { .. }));
    }

    #[test]
    fn test_invalid_pdf_bytes_rejected() {
        let err = PdfPageReader::from_bytes("bogus.pdf", b"This is not a PDF").unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }
}
