//! Configuration for the PDF ingestion pipeline.
//!
//! Settings are layered:
//! - Default values
//! - TOML configuration file (`.pdfmind/settings.toml`)
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `PDFMIND_` and use double
//! underscores to separate nested levels:
//! - `PDFMIND_PROCESSING__CHUNK_SIZE=800` sets `processing.chunk_size`
//! - `PDFMIND_STORE__DB_PATH=/data/vectors` sets `store.db_path`
//! - `PDFMIND_LOGGING__DEFAULT=debug` sets `logging.default`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::documents::ChunkingConfig;
use crate::documents::config::{default_chunk_size, default_overlap};
use crate::embedding::DEFAULT_BATCH_SIZE;
use crate::error::ConfigurationError;

/// Directory holding workspace configuration.
pub const CONFIG_DIR: &str = ".pdfmind";

/// Settings file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Chunking and embedding parameters
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Vector store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Embedding model loading
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProcessingConfig {
    /// Embedding model to load
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Target maximum characters per chunk before overlap stitching
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters of trailing context carried into the next chunk
    #[serde(default = "default_overlap")]
    pub overlap: usize,

    /// Chunks sent to the model per call
    #[serde(default = "default_batch_size")]
    pub embedding_batch_size: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StoreConfig {
    /// Location of the persistent vector store
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Collection records are written to
    #[serde(default = "default_collection_name")]
    pub collection_name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EmbeddingConfig {
    /// Where model files are cached. Defaults to the user cache directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,

    /// Show a progress bar while downloading model files
    #[serde(default = "default_true")]
    pub show_download_progress: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides (`pipeline = "debug"`)
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_version() -> u32 {
    1
}
fn default_model_name() -> String {
    "all-MiniLM-L6-v2".to_string()
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_db_path() -> PathBuf {
    PathBuf::from("./chroma_db")
}
fn default_collection_name() -> String {
    "pdf_collection".to_string()
}
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            processing: ProcessingConfig::default(),
            store: StoreConfig::default(),
            embedding: EmbeddingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            chunk_size: default_chunk_size(),
            overlap: default_overlap(),
            embedding_batch_size: default_batch_size(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            collection_name: default_collection_name(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            cache_dir: None,
            show_download_progress: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl ProcessingConfig {
    /// Chunker parameters.
    pub fn chunking(&self) -> ChunkingConfig {
        ChunkingConfig::new(self.chunk_size, self.overlap)
    }
}

impl EmbeddingConfig {
    /// Directory model files are cached in.
    pub fn models_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_models_dir)
    }
}

/// Default model cache: `<user cache dir>/pdfmind/models`.
pub fn default_models_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("pdfmind").join("models"))
        .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("models"))
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));

        Self::load_from(config_path)
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path.as_ref()))
            // Double underscore separates nesting, single underscore stays in the name
            .merge(Env::prefixed("PDFMIND_").map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Load a file the user named explicitly.
    ///
    /// Unlike [`Settings::load`], a missing or malformed file is an error
    /// rather than a silent fall back to defaults.
    pub fn load_required(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigurationError::Load(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Self::load_from(path).map_err(|e| ConfigurationError::Load(e.to_string()))
    }

    /// Find `.pdfmind/settings.toml` in the current directory or an ancestor
    pub fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let config_dir = ancestor.join(CONFIG_DIR);
            if config_dir.is_dir() {
                return Some(config_dir.join(CONFIG_FILE));
            }
        }

        None
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Write a default settings file under `root`
    pub fn init_config_file(
        root: impl AsRef<Path>,
        force: bool,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = root.as_ref().join(CONFIG_DIR).join(CONFIG_FILE);

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }

    /// Reject parameter values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.processing.model_name.trim().is_empty() {
            return Err(ConfigurationError::Empty {
                field: "processing.model_name",
            });
        }
        if self.store.collection_name.trim().is_empty() {
            return Err(ConfigurationError::Empty {
                field: "store.collection_name",
            });
        }
        if self.processing.embedding_batch_size == 0 {
            return Err(ConfigurationError::ZeroBatchSize);
        }
        self.processing.chunking().validate()
    }
}
