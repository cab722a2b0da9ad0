//! Similarity pruning of traversed relation paths.

use braid_core::RelationMap;

use crate::error::RetrievalError;
use crate::ranker::SimilarityRanker;

/// Selects the most query-relevant relation paths out of a traversal.
///
/// The map is flattened across all seeds into one candidate list and
/// ranked in a single call. Duplicate paths reachable from two seeds
/// stay duplicated; frequency acts as an implicit relevance signal for
/// downstream fusion.
pub struct KnowledgePruner {
    ranker: SimilarityRanker,
}

impl KnowledgePruner {
    /// A pruner over the given ranker.
    pub fn new(ranker: SimilarityRanker) -> Self {
        Self { ranker }
    }

    /// The `topk` paths most similar to the question, in rank order,
    /// scores discarded.
    pub async fn prune(
        &self,
        question: &str,
        map: &RelationMap,
        topk: usize,
    ) -> Result<Vec<String>, RetrievalError> {
        let candidates = map.flatten();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let ranked = self.ranker.rank(question, &candidates, topk).await?;
        Ok(ranked.into_iter().map(|c| c.text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use braid_llm::embeddings::MockEmbeddingProvider;

    fn pruner(provider: MockEmbeddingProvider) -> KnowledgePruner {
        KnowledgePruner::new(SimilarityRanker::new(Arc::new(provider)))
    }

    #[tokio::test]
    async fn prune_keeps_most_relevant_paths() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("capital of France?", vec![1.0, 0.0])
            .with_response("Paris -CapitalOf-> France", vec![0.9, 0.1])
            .with_response("Paris -Hosts-> Olympics", vec![0.1, 0.9]);
        let mut map = RelationMap::default();
        map.insert(
            "Paris",
            vec![
                "Paris -Hosts-> Olympics".to_string(),
                "Paris -CapitalOf-> France".to_string(),
            ],
        );

        let kept = pruner(provider)
            .prune("capital of France?", &map, 1)
            .await
            .unwrap();
        assert_eq!(kept, vec!["Paris -CapitalOf-> France"]);
    }

    #[tokio::test]
    async fn duplicates_across_seeds_are_kept() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("q", vec![1.0, 0.0])
            .with_response("A -R-> B", vec![1.0, 0.0]);
        let mut map = RelationMap::default();
        map.insert("A", vec!["A -R-> B".to_string()]);
        map.insert("B", vec!["A -R-> B".to_string()]);

        let kept = pruner(provider).prune("q", &map, 10).await.unwrap();
        assert_eq!(kept, vec!["A -R-> B", "A -R-> B"]);
    }

    #[tokio::test]
    async fn empty_map_skips_the_ranker() {
        let kept = pruner(MockEmbeddingProvider::failing())
            .prune("q", &RelationMap::default(), 5)
            .await
            .unwrap();
        assert!(kept.is_empty());
    }
}
