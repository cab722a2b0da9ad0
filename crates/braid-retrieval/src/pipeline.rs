//! The end-to-end retrieval pipeline.

use std::sync::Arc;

use tracing::{debug, info};

use braid_core::{
    fusion, ConfigError, Depth, ExtractionStrategy, FusionPolicy, RetrievalBundle,
    RetrievalSettings, RetrievalStrategy,
};
use braid_llm::{EmbeddingProvider, TextGenerationProvider};
use braid_store::{ChunkIndex, EntityIndex, GraphStore};

use crate::error::RetrievalError;
use crate::extractor::EntityExtractor;
use crate::pruner::KnowledgePruner;
use crate::ranker::SimilarityRanker;
use crate::traverser::GraphTraverser;

/// The retrieval pipeline: entity extraction, traversal, pruning, and
/// fusion with vector-retrieved chunks.
///
/// Every query runs the stages sequentially; independent queries may
/// run concurrently against one `Retriever` since all components share
/// state behind `Arc`s.
pub struct Retriever {
    extractor: EntityExtractor,
    traverser: GraphTraverser,
    pruner: KnowledgePruner,
    chunks: Arc<ChunkIndex>,
    settings: RetrievalSettings,
}

impl Retriever {
    /// Start assembling a pipeline.
    pub fn builder() -> RetrieverBuilder {
        RetrieverBuilder::default()
    }

    /// The settings this pipeline was built with.
    pub fn settings(&self) -> &RetrievalSettings {
        &self.settings
    }

    /// Run a query with the configured strategy, policy, depth, and topk.
    pub async fn retrieve_configured(
        &self,
        question: &str,
    ) -> Result<RetrievalBundle, RetrievalError> {
        self.retrieve(
            question,
            self.settings.strategy,
            self.settings.policy,
            self.settings.depth,
            self.settings.topk,
        )
        .await
    }

    /// Run a query.
    ///
    /// `vector` skips the graph entirely, `graph` skips chunk retrieval,
    /// and `hybrid` runs both sides and fuses them under `policy`.
    pub async fn retrieve(
        &self,
        question: &str,
        strategy: RetrievalStrategy,
        policy: FusionPolicy,
        depth: Depth,
        topk: usize,
    ) -> Result<RetrievalBundle, RetrievalError> {
        let chunks = match strategy {
            RetrievalStrategy::Graph => Vec::new(),
            RetrievalStrategy::Vector | RetrievalStrategy::Hybrid => {
                self.chunks.retrieve(question, topk).await?
            }
        };
        let paths = match strategy {
            RetrievalStrategy::Vector => Vec::new(),
            RetrievalStrategy::Graph | RetrievalStrategy::Hybrid => {
                self.graph_paths(question, depth, topk).await?
            }
        };

        let bundle = match strategy {
            RetrievalStrategy::Hybrid => fusion::merge(chunks, paths, policy),
            _ => RetrievalBundle::new(chunks, paths),
        };
        info!(
            strategy = %strategy,
            chunks = bundle.chunks.len(),
            paths = bundle.paths.len(),
            "retrieval complete"
        );
        Ok(bundle)
    }

    async fn graph_paths(
        &self,
        question: &str,
        depth: Depth,
        topk: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let entities = match self
            .extractor
            .extract(question, self.settings.entity_k)
            .await
        {
            Ok(entities) => entities,
            Err(RetrievalError::NoEntities) => {
                debug!("no entities resolved, graph side contributes nothing");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };
        let map = self
            .traverser
            .traverse(&entities, depth, self.settings.limit)
            .await;
        self.pruner.prune(question, &map, topk).await
    }
}

/// Assembles a [`Retriever`] from its collaborators.
#[derive(Default)]
pub struct RetrieverBuilder {
    graph: Option<Arc<dyn GraphStore>>,
    chunks: Option<Arc<ChunkIndex>>,
    entity_index: Option<Arc<EntityIndex>>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    llm: Option<Arc<dyn TextGenerationProvider>>,
    settings: RetrievalSettings,
}

impl RetrieverBuilder {
    /// The knowledge-graph store to traverse.
    pub fn graph(mut self, graph: Arc<dyn GraphStore>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// The chunk index for the vector side.
    pub fn chunks(mut self, chunks: Arc<ChunkIndex>) -> Self {
        self.chunks = Some(chunks);
        self
    }

    /// The entity index, required for the `entity_index` extraction
    /// strategy.
    pub fn entity_index(mut self, index: Arc<EntityIndex>) -> Self {
        self.entity_index = Some(index);
        self
    }

    /// The embedding provider used for pruning.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// The chat provider, required for the `keywords` extraction
    /// strategy.
    pub fn llm(mut self, llm: Arc<dyn TextGenerationProvider>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Pipeline tuning.
    pub fn settings(mut self, settings: RetrievalSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Assemble the pipeline.
    pub fn build(self) -> Result<Retriever, ConfigError> {
        let graph = self
            .graph
            .ok_or_else(|| ConfigError::Invalid("retriever needs a graph store".to_string()))?;
        let chunks = self
            .chunks
            .ok_or_else(|| ConfigError::Invalid("retriever needs a chunk index".to_string()))?;
        let embedder = self
            .embedder
            .ok_or_else(|| ConfigError::Invalid("retriever needs an embedder".to_string()))?;

        let extractor = match self.settings.extraction {
            ExtractionStrategy::EntityIndex => {
                let index = self.entity_index.ok_or_else(|| {
                    ConfigError::Invalid(
                        "entity_index extraction needs an entity index".to_string(),
                    )
                })?;
                EntityExtractor::Index(index)
            }
            ExtractionStrategy::Keywords => {
                let llm = self.llm.ok_or_else(|| {
                    ConfigError::Invalid("keywords extraction needs a chat provider".to_string())
                })?;
                EntityExtractor::Keywords(llm)
            }
        };

        Ok(Retriever {
            extractor,
            traverser: GraphTraverser::new(graph),
            pruner: KnowledgePruner::new(SimilarityRanker::new(embedder)),
            chunks,
            settings: self.settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::Triplet;
    use braid_llm::embeddings::MockEmbeddingProvider;
    use braid_store::{MemoryGraphStore, MemoryVectorStore};

    async fn retriever() -> Retriever {
        let provider = Arc::new(
            MockEmbeddingProvider::with_dimensions(2)
                .with_response("capital of France?", vec![1.0, 0.0])
                .with_response("Paris", vec![1.0, 0.0])
                .with_response("Tokyo", vec![0.0, 1.0])
                .with_response("Paris is the capital of France.", vec![0.95, 0.05])
                .with_response("Sushi is Japanese.", vec![0.0, 1.0])
                .with_response("Paris -CapitalOf-> France", vec![0.9, 0.1])
                .with_response("Paris <-Visited- Tom", vec![0.2, 0.8]),
        );

        let graph = Arc::new(MemoryGraphStore::new());
        graph
            .insert_triplets(&[
                Triplet::new("Paris", "CapitalOf", "France"),
                Triplet::new("Tom", "Visited", "Paris"),
            ])
            .await
            .unwrap();

        let chunks = Arc::new(ChunkIndex::new(
            Arc::new(MemoryVectorStore::new()),
            provider.clone(),
        ));
        chunks
            .add_chunks(vec![
                "Paris is the capital of France.".to_string(),
                "Sushi is Japanese.".to_string(),
            ])
            .await
            .unwrap();

        let entity_index = Arc::new(EntityIndex::new(
            Arc::new(MemoryVectorStore::new()),
            provider.clone(),
        ));
        entity_index
            .build(vec!["Paris".to_string(), "Tokyo".to_string()])
            .await
            .unwrap();

        Retriever::builder()
            .graph(graph as Arc<dyn GraphStore>)
            .chunks(chunks)
            .entity_index(entity_index)
            .embedder(provider)
            .settings(RetrievalSettings {
                entity_k: 1,
                depth: Depth::One,
                ..Default::default()
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn vector_strategy_skips_the_graph() {
        let retriever = retriever().await;
        let bundle = retriever
            .retrieve(
                "capital of France?",
                RetrievalStrategy::Vector,
                FusionPolicy::Union,
                Depth::One,
                1,
            )
            .await
            .unwrap();
        assert_eq!(bundle.chunks, vec!["Paris is the capital of France."]);
        assert!(bundle.paths.is_empty());
    }

    #[tokio::test]
    async fn graph_strategy_returns_pruned_paths() {
        let retriever = retriever().await;
        let bundle = retriever
            .retrieve(
                "capital of France?",
                RetrievalStrategy::Graph,
                FusionPolicy::Union,
                Depth::One,
                1,
            )
            .await
            .unwrap();
        assert!(bundle.chunks.is_empty());
        assert_eq!(bundle.paths, vec!["Paris -CapitalOf-> France"]);
    }

    #[tokio::test]
    async fn hybrid_intersection_keeps_corroborated_paths() {
        let retriever = retriever().await;
        let bundle = retriever
            .retrieve(
                "capital of France?",
                RetrievalStrategy::Hybrid,
                FusionPolicy::Intersection,
                Depth::One,
                2,
            )
            .await
            .unwrap();
        assert_eq!(bundle.chunks[0], "Paris is the capital of France.");
        // The Tom path has no support in the chunks.
        assert_eq!(bundle.paths, vec!["Paris -CapitalOf-> France"]);
    }

    #[tokio::test]
    async fn builder_rejects_missing_collaborators() {
        let err = Retriever::builder().build();
        assert!(err.is_err());
    }
}
