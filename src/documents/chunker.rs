//! Sentence-aware text chunking.
//!
//! Provides the `Chunker` trait and the sentence-packing implementation used
//! by the pipeline. The algorithm itself lives in [`split_text_smart`], a pure
//! function so it can be tested and reused without any chunker instance.

use std::sync::LazyLock;

use regex::Regex;

use super::config::ChunkingConfig;
use super::types::Chunk;

/// A sentence ends at `.`, `!` or `?` followed by one or more spaces.
///
/// Abbreviations ("Mr. Smith") split too. Newlines and tabs never end a sentence.
static SENTENCE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?] +").expect("sentence boundary pattern is valid"));

/// Trait for document chunking strategies.
pub trait Chunker: Send + Sync {
    /// Split document text into indexed chunks.
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk>;
}

/// Greedy sentence packer with overlap stitching.
///
/// Algorithm:
/// 1. Split the trimmed text into sentences
/// 2. Pack sentences greedily up to `chunk_size` characters
/// 3. Slice sentences longer than `chunk_size` into fixed-width pieces
/// 4. Prefix every chunk after the first with the tail of its predecessor
#[derive(Debug, Default, Clone, Copy)]
pub struct SentenceChunker;

impl SentenceChunker {
    /// Create a new sentence chunker.
    pub fn new() -> Self {
        Self
    }
}

impl Chunker for SentenceChunker {
    fn chunk(&self, text: &str, config: &ChunkingConfig) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = split_text_smart(text, config.chunk_size, config.overlap)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk::new(index, text))
            .collect();

        tracing::debug!(
            target: "chunker",
            "split {} chars into {} chunks (chunk_size={}, overlap={})",
            text.chars().count(),
            chunks.len(),
            config.chunk_size,
            config.overlap
        );

        chunks
    }
}

/// Split text into overlapping chunks of roughly `chunk_size` characters.
///
/// Lengths are counted in characters. Accepts `&str` or `Option<&str>`; empty
/// or absent text yields no chunks. A `chunk_size` of zero slices oversized
/// sentences one character at a time instead of looping.
///
/// Overlap is taken from the chunk list *before* stitching, so chunk `i`
/// never inherits overlap text that was itself injected into chunk `i - 1`.
pub fn split_text_smart<'a>(
    text: impl Into<Option<&'a str>>,
    chunk_size: usize,
    overlap: usize,
) -> Vec<String> {
    let Some(text) = text.into() else {
        return Vec::new();
    };

    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let initial_chunks = pack_sentences(split_sentences(text), chunk_size);
    stitch_overlaps(&initial_chunks, overlap)
}

/// Split text on the sentence boundary heuristic, keeping the terminator.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // Terminators are ASCII, so the sentence ends one byte into the match
        let end = boundary.start() + 1;
        sentences.push(&text[start..end]);
        start = boundary.end();
    }

    sentences.push(&text[start..]);
    sentences
}

/// Greedy packing pass producing the initial (pre-overlap) chunk list.
fn pack_sentences(sentences: Vec<&str>, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for sentence in sentences {
        let sentence_len = sentence.chars().count();

        // The joining space is charged even when `current` is empty
        let estimated_length = current_len + sentence_len + 1;

        if estimated_length <= chunk_size {
            if !current.is_empty() {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(sentence);
            current_len += sentence_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(current.trim().to_string());
        }

        if sentence_len > chunk_size {
            chunks.extend(
                fixed_width_slices(sentence, chunk_size)
                    .into_iter()
                    .map(|slice| slice.trim().to_string()),
            );
            current.clear();
            current_len = 0;
        } else {
            current = sentence.to_string();
            current_len = sentence_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}

/// Cut `text` into consecutive slices of `width` characters (last may be shorter).
fn fixed_width_slices(text: &str, width: usize) -> Vec<&str> {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .step_by(width.max(1))
        .chain(std::iter::once(text.len()))
        .collect();

    boundaries.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

/// Prefix each chunk after the first with the trimmed tail of its predecessor.
fn stitch_overlaps(initial_chunks: &[String], overlap: usize) -> Vec<String> {
    initial_chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            if i == 0 {
                return chunk.trim().to_string();
            }

            let overlap_text = trailing_chars(&initial_chunks[i - 1], overlap).trim();
            if chunk.starts_with(overlap_text) {
                chunk.trim().to_string()
            } else {
                format!("{overlap_text} {chunk}").trim().to_string()
            }
        })
        .collect()
}

/// Last `count` characters of `text` (the whole text if it is shorter).
fn trailing_chars(text: &str, count: usize) -> &str {
    if count == 0 {
        return "";
    }

    match text.char_indices().rev().nth(count - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}
