//! Embedding model name resolution.
//!
//! Accepts both sentence-transformers style names (`all-MiniLM-L6-v2`,
//! `BAAI/bge-small-en-v1.5`) and fastembed enum names (`AllMiniLML6V2`),
//! compared case-insensitively.

use fastembed::EmbeddingModel;

use super::ModelLoadError;

/// A supported embedding model.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Canonical name, as written in settings.
    pub name: &'static str,
    /// Other accepted spellings.
    pub aliases: &'static [&'static str],
    /// fastembed model identifier.
    pub model: EmbeddingModel,
    /// Output vector dimension.
    pub dimension: usize,
}

impl ModelSpec {
    fn matches(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(name))
    }
}

/// All models this build knows how to load.
pub fn supported_models() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            name: "all-MiniLM-L6-v2",
            aliases: &["sentence-transformers/all-MiniLM-L6-v2", "AllMiniLML6V2"],
            model: EmbeddingModel::AllMiniLML6V2,
            dimension: 384,
        },
        ModelSpec {
            name: "all-MiniLM-L12-v2",
            aliases: &["sentence-transformers/all-MiniLM-L12-v2", "AllMiniLML12V2"],
            model: EmbeddingModel::AllMiniLML12V2,
            dimension: 384,
        },
        ModelSpec {
            name: "paraphrase-multilingual-MiniLM-L12-v2",
            aliases: &[
                "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2",
                "ParaphraseMLMiniLML12V2",
            ],
            model: EmbeddingModel::ParaphraseMLMiniLML12V2,
            dimension: 384,
        },
        ModelSpec {
            name: "bge-small-en-v1.5",
            aliases: &["BAAI/bge-small-en-v1.5", "BGESmallENV15"],
            model: EmbeddingModel::BGESmallENV15,
            dimension: 384,
        },
        ModelSpec {
            name: "bge-base-en-v1.5",
            aliases: &["BAAI/bge-base-en-v1.5", "BGEBaseENV15"],
            model: EmbeddingModel::BGEBaseENV15,
            dimension: 768,
        },
        ModelSpec {
            name: "bge-large-en-v1.5",
            aliases: &["BAAI/bge-large-en-v1.5", "BGELargeENV15"],
            model: EmbeddingModel::BGELargeENV15,
            dimension: 1024,
        },
        ModelSpec {
            name: "nomic-embed-text-v1.5",
            aliases: &["nomic-ai/nomic-embed-text-v1.5", "NomicEmbedTextV15"],
            model: EmbeddingModel::NomicEmbedTextV15,
            dimension: 768,
        },
        ModelSpec {
            name: "multilingual-e5-small",
            aliases: &["intfloat/multilingual-e5-small", "MultilingualE5Small"],
            model: EmbeddingModel::MultilingualE5Small,
            dimension: 384,
        },
        ModelSpec {
            name: "multilingual-e5-base",
            aliases: &["intfloat/multilingual-e5-base", "MultilingualE5Base"],
            model: EmbeddingModel::MultilingualE5Base,
            dimension: 768,
        },
        ModelSpec {
            name: "multilingual-e5-large",
            aliases: &["intfloat/multilingual-e5-large", "MultilingualE5Large"],
            model: EmbeddingModel::MultilingualE5Large,
            dimension: 1024,
        },
    ]
}

/// Look up a model by any accepted name.
pub fn resolve_model(name: &str) -> Result<ModelSpec, ModelLoadError> {
    let name = name.trim();
    let models = supported_models();

    if let Some(spec) = models.iter().find(|spec| spec.matches(name)) {
        return Ok(spec.clone());
    }

    let supported = models
        .iter()
        .map(|spec| spec.name)
        .collect::<Vec<_>>()
        .join(", ");

    Err(ModelLoadError::UnknownModel {
        name: name.to_string(),
        supported,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default_model() {
        let spec = resolve_model("all-MiniLM-L6-v2").unwrap();
        assert_eq!(spec.name, "all-MiniLM-L6-v2");
        assert_eq!(spec.dimension, 384);
    }

    #[test]
    fn test_resolve_aliases_case_insensitive() {
        assert_eq!(resolve_model("AllMiniLML6V2").unwrap().name, "all-MiniLM-L6-v2");
        assert_eq!(
            resolve_model("sentence-transformers/all-minilm-l6-v2")
                .unwrap()
                .name,
            "all-MiniLM-L6-v2"
        );
        assert_eq!(resolve_model("baai/BGE-base-en-v1.5").unwrap().dimension, 768);
        assert_eq!(resolve_model("  bge-small-en-v1.5 ").unwrap().dimension, 384);
    }

    #[test]
    fn test_unknown_model_lists_supported() {
        let err = resolve_model("gpt-embeddings-9000").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("gpt-embeddings-9000"));
        assert!(message.contains("all-MiniLM-L6-v2"));
    }

    #[test]
    fn test_supported_names_unique() {
        let models = supported_models();
        let mut names: Vec<String> = models
            .iter()
            .flat_map(|m| std::iter::once(m.name).chain(m.aliases.iter().copied()))
            .map(str::to_lowercase)
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
