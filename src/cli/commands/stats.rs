//! Stats command - inspect a stored collection.

use anyhow::bail;
use serde::Serialize;

use crate::cli::args::StatsArgs;
use crate::config::Settings;
use crate::store::{CollectionMetadata, TantivyVectorStore, VectorStore};

#[derive(Debug, Serialize)]
struct StatsReport<'a> {
    records: usize,
    path: &'a std::path::Path,
    #[serde(flatten)]
    metadata: &'a CollectionMetadata,
}

/// Run stats command.
pub fn run(args: &StatsArgs, settings: &Settings) -> anyhow::Result<()> {
    let db_path = args.db_path.as_ref().unwrap_or(&settings.store.db_path);
    let collection = args
        .collection
        .as_deref()
        .unwrap_or(&settings.store.collection_name);

    let Some(store) = TantivyVectorStore::open_existing(db_path, collection)? else {
        bail!(
            "Collection '{collection}' not found in {}. Run 'pdfmind process <PDF>' first.",
            db_path.display()
        );
    };

    let records = store.count()?;
    let metadata = store.metadata();

    if args.json {
        let report = StatsReport {
            records,
            path: store.path(),
            metadata,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Collection: {}", metadata.name);
    println!("{}", "=".repeat(50));
    println!("Path:        {}", store.path().display());
    println!("Records:     {records}");
    match metadata.dimension {
        Some(dimension) => println!("Dimension:   {dimension}"),
        None => println!("Dimension:   (empty collection)"),
    }
    println!("Created:     {}", metadata.created_at);
    println!("Updated:     {}", metadata.updated_at);

    if let Some(source) = &metadata.source {
        println!("Source:      {}", source.path.display());
        if let Some(hash) = &source.content_hash {
            println!("SHA-256:     {hash}");
        }
        println!("Model:       {}", source.model_name);
        println!(
            "Last run:    {} pages, {} chunks",
            source.page_count, source.chunk_count
        );
    }
    Ok(())
}
