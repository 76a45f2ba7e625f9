//! CLI argument parsing using clap.
//!
//! Contains the Cli struct, Commands enum, and the per-command argument structs.

use clap::{
    Args, Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

use crate::config::Settings;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Quick start examples shown after the generated help
fn quick_start() -> String {
    use console::style;

    let mut help = String::new();
    help.push_str(&format!("{}\n", style("Quick Start:").cyan().bold()));
    help.push_str("  $ pdfmind init                          # Write .pdfmind/settings.toml\n");
    help.push_str("  $ pdfmind process paper.pdf             # Extract, chunk, embed and store\n");
    help.push_str("  $ pdfmind chunk paper.pdf --json        # Inspect chunks without embedding\n");
    help.push_str("  $ pdfmind stats                         # Show the stored collection\n");
    help
}

/// Offline PDF ingestion into a local vector store
#[derive(Parser)]
#[command(
    name = "pdfmind",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract, chunk and embed PDF text into a local vector store",
    next_line_help = true,
    styles = clap_cargo_style(),
    after_help = quick_start()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .pdfmind directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// Run the full pipeline on a PDF
    #[command(about = "Extract, chunk, embed and store a PDF")]
    Process(ProcessArgs),

    /// Extract and chunk a PDF without embedding
    #[command(about = "Show the chunks a PDF produces")]
    Chunk(ChunkArgs),

    /// Inspect a stored collection
    #[command(about = "Show record count and metadata for a collection")]
    Stats(StatsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    /// PDF file to ingest
    #[arg(value_name = "PDF")]
    pub file: PathBuf,

    /// Embedding model (overrides config)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Target characters per chunk (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap characters between chunks (overrides config)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Vector store directory (overrides config)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Collection name (overrides config)
    #[arg(long)]
    pub collection: Option<String>,

    /// Embed but keep records in memory instead of writing the store
    #[arg(long)]
    pub dry_run: bool,

    /// Disable the embedding progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl ProcessArgs {
    /// Layer CLI overrides on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(model) = &self.model {
            settings.processing.model_name = model.clone();
        }
        if let Some(chunk_size) = self.chunk_size {
            settings.processing.chunk_size = chunk_size;
        }
        if let Some(overlap) = self.overlap {
            settings.processing.overlap = overlap;
        }
        if let Some(db_path) = &self.db_path {
            settings.store.db_path = db_path.clone();
        }
        if let Some(collection) = &self.collection {
            settings.store.collection_name = collection.clone();
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ChunkArgs {
    /// PDF file to chunk
    #[arg(value_name = "PDF")]
    pub file: PathBuf,

    /// Target characters per chunk (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap characters between chunks (overrides config)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Output JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    /// Vector store directory (overrides config)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Collection name (overrides config)
    #[arg(long)]
    pub collection: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
