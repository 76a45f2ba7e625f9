//! Chunk command - extraction and chunking only, for tuning parameters.

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;

use crate::cli::args::ChunkArgs;
use crate::config::Settings;
use crate::documents::{
    Chunk, Chunker, ChunkingConfig, PdfPageReader, SentenceChunker, extract_document,
};

const PREVIEW_CHARS: usize = 60;

#[derive(Debug, Serialize)]
struct ChunkReport<'a> {
    source: &'a std::path::Path,
    pages: usize,
    chunk_size: usize,
    overlap: usize,
    chunks: Vec<ChunkEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ChunkEntry<'a> {
    id: String,
    chars: usize,
    text: &'a str,
}

/// Run chunk command.
pub fn run(args: &ChunkArgs, settings: &Settings) -> anyhow::Result<()> {
    let chunking = ChunkingConfig::new(
        args.chunk_size.unwrap_or(settings.processing.chunk_size),
        args.overlap.unwrap_or(settings.processing.overlap),
    );
    chunking.validate()?;

    let reader = PdfPageReader::open(&args.file)?;
    let document = extract_document(&args.file, &reader)?;
    let chunks = SentenceChunker::new().chunk(&document.full_text(), &chunking);

    if args.json {
        let report = ChunkReport {
            source: &args.file,
            pages: document.page_count(),
            chunk_size: chunking.chunk_size,
            overlap: chunking.overlap,
            chunks: chunks
                .iter()
                .map(|chunk| ChunkEntry {
                    id: chunk.record_id(),
                    chars: chunk.char_count(),
                    text: &chunk.text,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{}: {} pages, {} chunks (chunk_size {}, overlap {})",
        args.file.display(),
        document.page_count(),
        chunks.len(),
        chunking.chunk_size,
        chunking.overlap
    );
    if !chunks.is_empty() {
        println!("{}", chunk_table(&chunks));
    }
    Ok(())
}

fn chunk_table(chunks: &[Chunk]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["id", "chars", "preview"]);

    for chunk in chunks {
        let mut preview = chunk.preview(PREVIEW_CHARS).replace('\n', " ");
        if chunk.char_count() > PREVIEW_CHARS {
            preview.push('…');
        }
        table.add_row(vec![chunk.record_id(), chunk.char_count().to_string(), preview]);
    }
    table
}
