//! PDF ingestion pipeline
//!
//! A strictly sequential state machine. Each stage consumes the complete
//! output of the previous one:
//!
//! ```text
//! EXTRACT → CHUNK → EMBED → STORE
//!    │        │       │       │
//!    ▼        ▼       ▼       ▼
//!  [text]  [chunks] [vecs]  collection
//! ```
//!
//! Any stage failure moves the pipeline to `Failed` and skips the remaining
//! stages. Records are only written in the final stage, so a run that fails
//! earlier stores nothing.
//!
//! ## Usage
//!
//! ```ignore
//! use pdfmind::pipeline::{LocalBackend, Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::from_settings(&settings);
//! let mut pipeline = Pipeline::new(config, LocalBackend::new(&settings.embedding));
//! let outcome = pipeline.run("paper.pdf");
//! ```

pub mod backend;
pub mod config;
pub mod types;

pub use backend::{LocalBackend, PipelineBackend};
pub use config::PipelineConfig;
pub use types::{PipelineEvent, PipelineOutcome, PipelineState, PipelineSummary};

use std::path::Path;
use std::time::Instant;

use crate::documents::{Chunk, Chunker, SentenceChunker, extract_document};
use crate::embedding::generate_embeddings;
use crate::error::{PipelineError, PipelineResult};
use crate::store::SourceInfo;
use crate::{debug_event, log_event};

/// The ingestion pipeline.
pub struct Pipeline<B: PipelineBackend = LocalBackend> {
    config: PipelineConfig,
    backend: B,
    chunker: Box<dyn Chunker>,
    state: PipelineState,
    history: Vec<PipelineState>,
}

impl<B: PipelineBackend> std::fmt::Debug for Pipeline<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

impl<B: PipelineBackend> Pipeline<B> {
    pub fn new(config: PipelineConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            chunker: Box::new(SentenceChunker::new()),
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
        }
    }

    /// Replace the chunking strategy.
    pub fn with_chunker(mut self, chunker: Box<dyn Chunker>) -> Self {
        self.chunker = chunker;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// States visited by the most recent run, starting at `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    /// Run the pipeline, capturing any failure in the outcome.
    pub fn run(&mut self, path: impl AsRef<Path>) -> PipelineOutcome {
        self.run_with_progress(path, |_| {})
    }

    /// [`run`](Self::run) with progress notifications.
    pub fn run_with_progress<F>(&mut self, path: impl AsRef<Path>, on_event: F) -> PipelineOutcome
    where
        F: FnMut(&PipelineEvent),
    {
        let path = path.as_ref();
        match self.try_run_with_progress(path, on_event) {
            Ok(summary) => PipelineOutcome::Completed(summary),
            Err(error) => {
                // history ends [.., failing stage, Failed]
                let stage = self
                    .history
                    .iter()
                    .rev()
                    .nth(1)
                    .copied()
                    .unwrap_or(PipelineState::Idle);
                PipelineOutcome::Failed { stage, error }
            }
        }
    }

    /// Run the pipeline, propagating the first failure.
    pub fn try_run(&mut self, path: impl AsRef<Path>) -> PipelineResult<PipelineSummary> {
        self.try_run_with_progress(path, |_| {})
    }

    /// [`try_run`](Self::try_run) with progress notifications.
    pub fn try_run_with_progress<F>(
        &mut self,
        path: impl AsRef<Path>,
        mut on_event: F,
    ) -> PipelineResult<PipelineSummary>
    where
        F: FnMut(&PipelineEvent),
    {
        let path = path.as_ref();
        self.state = PipelineState::Idle;
        self.history = vec![PipelineState::Idle];

        match self.execute(path, &mut on_event) {
            Ok(summary) => {
                self.transition(PipelineState::Done, &mut on_event)?;
                log_event!(
                    "pipeline",
                    "completed",
                    "{} records stored in '{}' from {} in {:.2?}",
                    summary.records_stored,
                    summary.collection,
                    path.display(),
                    summary.elapsed
                );
                Ok(summary)
            }
            Err(error) => {
                let stage = self.state;
                self.transition(PipelineState::Failed, &mut on_event)?;
                tracing::error!(
                    target: "pipeline",
                    "{} stage failed for {}: {error}",
                    stage,
                    path.display()
                );
                Err(error)
            }
        }
    }

    fn execute(
        &mut self,
        path: &Path,
        on_event: &mut dyn FnMut(&PipelineEvent),
    ) -> PipelineResult<PipelineSummary> {
        let start = Instant::now();
        self.config.validate()?;

        // EXTRACT
        self.transition(PipelineState::Extracting, on_event)?;
        let reader = self.backend.open_document(path)?;
        let content_hash = reader.content_hash();
        let document = extract_document(path, reader.as_ref())?;
        drop(reader);
        let text = document.full_text();
        on_event(&PipelineEvent::PagesExtracted {
            pages: document.page_count(),
            chars: text.chars().count(),
        });

        // CHUNK
        self.transition(PipelineState::Chunking, on_event)?;
        let chunks = self.chunker.chunk(&text, &self.config.chunking);
        on_event(&PipelineEvent::ChunksCreated {
            chunks: chunks.len(),
        });

        // EMBED
        self.transition(PipelineState::Embedding, on_event)?;
        let embedder = self.backend.load_embedder(&self.config.model_name)?;
        on_event(&PipelineEvent::ModelLoaded {
            model: embedder.model_name().to_string(),
            dimension: embedder.dimension(),
        });
        let embeddings = generate_embeddings(
            embedder.as_ref(),
            &chunks,
            self.config.batch_size,
            |current, total| on_event(&PipelineEvent::EmbeddingProgress { current, total }),
        )?;
        if embeddings.len() != chunks.len() {
            return Err(PipelineError::Invariant(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        // STORE
        self.transition(PipelineState::Storing, on_event)?;
        let mut store = self
            .backend
            .open_store(&self.config.db_path, &self.config.collection_name)?;
        let ids: Vec<String> = chunks.iter().map(Chunk::record_id).collect();
        let documents: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let records_stored = store.upsert(&ids, &embeddings, &documents)?;
        if records_stored != chunks.len() {
            return Err(PipelineError::Invariant(format!(
                "{} chunks but {records_stored} records stored",
                chunks.len()
            )));
        }
        store.record_source(&SourceInfo {
            path: path.to_path_buf(),
            content_hash,
            model_name: embedder.model_name().to_string(),
            page_count: document.page_count(),
            chunk_count: chunks.len(),
        })?;
        on_event(&PipelineEvent::RecordsStored {
            count: records_stored,
            collection: store.collection_name().to_string(),
        });

        Ok(PipelineSummary {
            source: path.to_path_buf(),
            pages: document.page_count(),
            chunks: chunks.len(),
            records_stored,
            model_name: embedder.model_name().to_string(),
            dimension: embedder.dimension(),
            collection: store.collection_name().to_string(),
            elapsed: start.elapsed(),
        })
    }

    fn transition(
        &mut self,
        to: PipelineState,
        on_event: &mut dyn FnMut(&PipelineEvent),
    ) -> PipelineResult<()> {
        let from = self.state;
        if !from.can_transition_to(to) {
            return Err(PipelineError::Invariant(format!(
                "illegal transition {from} -> {to}"
            )));
        }

        debug_event!("pipeline", "transition", "{from} -> {to}");
        self.state = to;
        self.history.push(to);
        on_event(&PipelineEvent::StateChanged { from, to });
        Ok(())
    }
}
