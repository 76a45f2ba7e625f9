pub mod cli;
pub mod config;
pub mod documents;
pub mod embedding;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod store;

pub use config::Settings;
pub use documents::{Chunk, ChunkingConfig, Document, Embedding, split_text_smart};
pub use embedding::Embedder;
pub use error::{ConfigurationError, PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutcome, PipelineState, PipelineSummary};
pub use store::{StoreWriteError, VectorStore};
