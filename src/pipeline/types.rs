//! Pipeline state machine and run results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::PipelineError;

/// Where a run currently is.
///
/// ```text
/// Idle → Extracting → Chunking → Embedding → Storing → Done
///   └──────────┴───────────┴──────────┴──────────┴──→ Failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    Idle,
    Extracting,
    Chunking,
    Embedding,
    Storing,
    Done,
    Failed,
}

impl PipelineState {
    /// `Done` and `Failed` end a run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The state a successful stage hands over to.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Idle => Some(Self::Extracting),
            Self::Extracting => Some(Self::Chunking),
            Self::Chunking => Some(Self::Embedding),
            Self::Embedding => Some(Self::Storing),
            Self::Storing => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Whether `self → to` is a legal transition.
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        to == Self::Failed || self.next() == Some(to)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::Chunking => "chunking",
            Self::Embedding => "embedding",
            Self::Storing => "storing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress notifications emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The pipeline moved to a new state.
    StateChanged {
        from: PipelineState,
        to: PipelineState,
    },
    /// Text extraction finished.
    PagesExtracted { pages: usize, chars: usize },
    /// Chunking finished.
    ChunksCreated { chunks: usize },
    /// The embedding model is ready.
    ModelLoaded { model: String, dimension: usize },
    /// A batch of chunks was embedded.
    EmbeddingProgress { current: usize, total: usize },
    /// Records were written to the collection.
    RecordsStored { count: usize, collection: String },
}

/// Statistics for a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    /// Source document path
    pub source: PathBuf,
    /// Pages extracted
    pub pages: usize,
    /// Chunks produced
    pub chunks: usize,
    /// Records written to the store
    pub records_stored: usize,
    /// Canonical name of the embedding model
    pub model_name: String,
    /// Embedding dimension
    pub dimension: usize,
    /// Collection written to
    pub collection: String,
    /// Wall time for the run
    pub elapsed: Duration,
}

/// Result of [`Pipeline::run`](super::Pipeline::run).
///
/// Failures are values: the stage that failed and its error are captured
/// rather than propagated.
#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(PipelineSummary),
    Failed {
        /// State the pipeline was in when the error occurred
        stage: PipelineState,
        error: PipelineError,
    },
}

impl PipelineOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Records stored by the run; zero for a failed run.
    pub fn records_stored(&self) -> usize {
        match self {
            Self::Completed(summary) => summary.records_stored,
            Self::Failed { .. } => 0,
        }
    }

    /// Convert into a `Result` for callers that want fail-fast propagation.
    pub fn into_result(self) -> Result<PipelineSummary, PipelineError> {
        match self {
            Self::Completed(summary) => Ok(summary),
            Self::Failed { error, .. } => Err(error),
        }
    }
}
