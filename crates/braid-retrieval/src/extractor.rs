//! Question-to-entity resolution.

use std::sync::Arc;

use tracing::debug;

use braid_core::prompts;
use braid_llm::TextGenerationProvider;
use braid_store::EntityIndex;

use crate::error::RetrievalError;

/// Resolves a free-text question into seed entities for traversal.
///
/// Two strategies, selected by configuration: nearest-neighbor lookup
/// against the entity-embedding index, or LLM keyword extraction. The
/// index strategy avoids a generation round-trip per query; keywords
/// trade latency for recall on paraphrased questions. Both return
/// entities in relevance order, closest first.
pub enum EntityExtractor {
    /// Nearest-neighbor lookup in the entity-embedding index.
    Index(Arc<EntityIndex>),
    /// LLM keyword extraction.
    Keywords(Arc<dyn TextGenerationProvider>),
}

impl EntityExtractor {
    /// Resolve up to `k` entities for the question.
    ///
    /// Fails with [`RetrievalError::NoEntities`] when nothing resolves;
    /// the pipeline recovers that into an empty graph-side result.
    pub async fn extract(&self, question: &str, k: usize) -> Result<Vec<String>, RetrievalError> {
        let entities = match self {
            EntityExtractor::Index(index) => index.lookup(question, k).await?,
            EntityExtractor::Keywords(llm) => {
                let reply = llm.complete(&prompts::keyword_prompt(question, k), &[]).await?;
                let mut keywords = prompts::parse_keywords(&reply);
                keywords.truncate(k);
                keywords
            }
        };
        if entities.is_empty() {
            return Err(RetrievalError::NoEntities);
        }
        debug!(count = entities.len(), "resolved seed entities");
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_llm::chat::MockChatProvider;
    use braid_llm::embeddings::MockEmbeddingProvider;
    use braid_store::MemoryVectorStore;

    #[tokio::test]
    async fn keyword_strategy_normalizes_and_caps() {
        let llm = MockChatProvider::new().with_reply("KEYWORDS: paris, eiffel tower, FRANCE");
        let extractor = EntityExtractor::Keywords(Arc::new(llm));
        let entities = extractor.extract("where is the eiffel tower?", 2).await.unwrap();
        assert_eq!(entities, vec!["Paris", "Eiffel tower"]);
    }

    #[tokio::test]
    async fn keyword_strategy_with_no_keywords_is_no_entities() {
        let llm = MockChatProvider::new().with_reply("KEYWORDS:");
        let extractor = EntityExtractor::Keywords(Arc::new(llm));
        let err = extractor.extract("???", 5).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NoEntities));
    }

    #[tokio::test]
    async fn index_strategy_returns_nearest_entities() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("Paris", vec![1.0, 0.0])
            .with_response("Tokyo", vec![0.0, 1.0])
            .with_response("Where is the Louvre?", vec![0.9, 0.1]);
        let index = EntityIndex::new(Arc::new(MemoryVectorStore::new()), Arc::new(provider));
        index
            .build(vec!["Paris".to_string(), "Tokyo".to_string()])
            .await
            .unwrap();

        let extractor = EntityExtractor::Index(Arc::new(index));
        let entities = extractor.extract("Where is the Louvre?", 1).await.unwrap();
        assert_eq!(entities, vec!["Paris"]);
    }

    #[tokio::test]
    async fn empty_index_is_no_entities() {
        let index = EntityIndex::new(
            Arc::new(MemoryVectorStore::new()),
            Arc::new(MockEmbeddingProvider::with_dimensions(2)),
        );
        let extractor = EntityExtractor::Index(Arc::new(index));
        let err = extractor.extract("anything", 3).await.unwrap_err();
        assert!(matches!(err, RetrievalError::NoEntities));
    }
}
