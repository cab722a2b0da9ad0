//! TOML-backed configuration for the retrieval pipeline.
//!
//! Every section has sane defaults, so an empty file (or no file at all)
//! yields a working in-memory setup pointed at a local Ollama daemon.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{Depth, FusionPolicy, RetrievalStrategy};

/// Which LLM/embedding provider to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local Ollama daemon.
    Ollama,
    /// OpenAI-compatible HTTP API.
    OpenAI,
    /// In-process deterministic provider, for tests and offline runs.
    Mock,
}

/// Embedding provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Provider backend.
    pub provider: ProviderKind,
    /// Model identifier, e.g. `nomic-embed-text`.
    pub model: String,
    /// Base URL of the provider's HTTP API.
    pub base_url: String,
    /// API key, if the provider needs one.
    pub api_key: Option<String>,
    /// Embedding dimensionality.
    pub dimensions: usize,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "nomic-embed-text".to_string(),
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            dimensions: 768,
            timeout_secs: 60,
        }
    }
}

/// Chat/completion provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Provider backend.
    pub provider: ProviderKind,
    /// Model identifier, e.g. `llama3.1`.
    pub model: String,
    /// Base URL of the provider's HTTP API.
    pub base_url: String,
    /// API key, if the provider needs one.
    pub api_key: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: "llama3.1".to_string(),
            base_url: "http://localhost:11434".to_string(),
            api_key: None,
            temperature: 0.0,
            timeout_secs: 120,
        }
    }
}

/// Graph store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum GraphBackend {
    /// Transient in-process store.
    Memory,
    /// Embedded SurrealDB, persisted on disk.
    Surreal {
        /// Database directory.
        path: PathBuf,
    },
}

impl Default for GraphBackend {
    fn default() -> Self {
        GraphBackend::Memory
    }
}

/// Vector store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    /// Transient in-process store with brute-force cosine search.
    Memory,
}

impl Default for VectorBackend {
    fn default() -> Self {
        VectorBackend::Memory
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorSettings {
    /// Storage backend.
    pub backend: VectorBackend,
}

/// How query entities are derived from the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// Embed the question and look up nearest known entities.
    EntityIndex,
    /// Ask the LLM for keywords, then match them against the graph.
    Keywords,
}

/// Retrieval pipeline tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Overall retrieval mode.
    pub strategy: RetrievalStrategy,
    /// How graph paths are fused with chunks in hybrid mode.
    pub policy: FusionPolicy,
    /// Traversal depth from each seed entity.
    pub depth: Depth,
    /// Cap on paths pulled out of the graph per traversal call.
    pub limit: usize,
    /// Paths kept after similarity pruning, and chunks kept per query.
    pub topk: usize,
    /// Nearest entities looked up per question.
    pub entity_k: usize,
    /// How seed entities are derived.
    pub extraction: ExtractionStrategy,
    /// Keyword cap when `extraction = "keywords"`.
    pub max_keywords: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            strategy: RetrievalStrategy::Hybrid,
            policy: FusionPolicy::Union,
            depth: Depth::Two,
            limit: 30,
            topk: 30,
            entity_k: 5,
            extraction: ExtractionStrategy::EntityIndex,
            max_keywords: 5,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BraidConfig {
    /// Embedding provider.
    pub embedding: EmbeddingSettings,
    /// Chat provider.
    pub llm: LlmSettings,
    /// Knowledge-graph store.
    pub graph: GraphBackend,
    /// Vector store.
    pub vector: VectorSettings,
    /// Pipeline tuning.
    pub retrieval: RetrievalSettings,
}

impl BraidConfig {
    /// Parse a config from TOML text and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, or fall back to defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                Self::from_toml_str(&text)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.embedding.dimensions == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimensions must be non-zero".to_string(),
            ));
        }
        if self.retrieval.topk == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.topk must be non-zero".to_string(),
            ));
        }
        if self.retrieval.entity_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.entity_k must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = BraidConfig::from_toml_str("").unwrap();
        assert_eq!(config.embedding.provider, ProviderKind::Ollama);
        assert_eq!(config.retrieval.limit, 30);
        assert_eq!(config.retrieval.depth, Depth::Two);
        assert_eq!(config.graph, GraphBackend::Memory);
    }

    #[test]
    fn partial_toml_overrides_selected_fields() {
        let config = BraidConfig::from_toml_str(
            r#"
            [retrieval]
            strategy = "graph"
            policy = "intersection"
            depth = 1
            topk = 10

            [graph]
            backend = "surreal"
            path = "/tmp/braid-graph"
            "#,
        )
        .unwrap();
        assert_eq!(config.retrieval.strategy, RetrievalStrategy::Graph);
        assert_eq!(config.retrieval.policy, FusionPolicy::Intersection);
        assert_eq!(config.retrieval.depth, Depth::One);
        assert_eq!(config.retrieval.topk, 10);
        assert_eq!(
            config.graph,
            GraphBackend::Surreal {
                path: PathBuf::from("/tmp/braid-graph")
            }
        );
        // Untouched sections keep defaults.
        assert_eq!(config.llm.model, "llama3.1");
    }

    #[test]
    fn invalid_depth_is_rejected() {
        let err = BraidConfig::from_toml_str("[retrieval]\ndepth = 3\n");
        assert!(err.is_err());
    }

    #[test]
    fn zero_topk_is_rejected() {
        let err = BraidConfig::from_toml_str("[retrieval]\ntopk = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
