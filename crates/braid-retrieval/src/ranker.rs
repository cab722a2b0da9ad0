//! Embedding-similarity ranking.

use std::sync::Arc;

use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use braid_core::ScoredCandidate;
use braid_llm::{EmbeddingError, EmbeddingProvider};

use crate::error::RetrievalError;

/// Ranks candidate texts by cosine similarity to a query.
///
/// The whole candidate batch is scored in one matrix operation, so
/// tie-breaking is deterministic: the sort is stable and ties keep the
/// original candidate order. Any embedding failure aborts the call;
/// partial rankings are never returned.
pub struct SimilarityRanker {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SimilarityRanker {
    /// A ranker over the given embedding provider.
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Score every candidate against the query and keep the top `topk`,
    /// highest first.
    pub async fn rank(
        &self,
        query: &str,
        candidates: &[String],
        topk: usize,
    ) -> Result<Vec<ScoredCandidate>, RetrievalError> {
        if candidates.is_empty() || topk == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed(query).await?;
        let candidate_vecs = self.embedder.embed_batch(candidates).await?;
        let dim = query_vec.len();

        // A single candidate still goes through the 1xD matrix path.
        let mut matrix = Array2::<f32>::zeros((candidate_vecs.len(), dim));
        for (i, vector) in candidate_vecs.iter().enumerate() {
            if vector.len() != dim {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "candidate {} has {} dimensions, query has {}",
                    i,
                    vector.len(),
                    dim
                ))
                .into());
            }
            matrix.row_mut(i).assign(&Array1::from_vec(vector.clone()));
        }

        let query_vec = Array1::from_vec(query_vec);
        let dots = matrix.dot(&query_vec);
        let query_norm = query_vec.dot(&query_vec).sqrt();
        let row_norms = matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt());

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let denom = query_norm * row_norms[i];
                let score = if denom == 0.0 { 0.0 } else { dots[i] / denom };
                ScoredCandidate {
                    text: text.clone(),
                    score,
                }
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(topk);
        debug!(candidates = candidates.len(), kept = scored.len(), "ranked candidates");
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_llm::embeddings::MockEmbeddingProvider;

    fn ranker(provider: MockEmbeddingProvider) -> SimilarityRanker {
        SimilarityRanker::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn rank_sorts_descending_and_truncates() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("capital of France", vec![1.0, 0.0])
            .with_response("Paris is the capital of France", vec![0.9, 0.1])
            .with_response("Berlin is a city", vec![0.0, 1.0]);
        let candidates = vec![
            "Berlin is a city".to_string(),
            "Paris is the capital of France".to_string(),
        ];

        let ranked = ranker(provider)
            .rank("capital of France", &candidates, 1)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].text, "Paris is the capital of France");
        assert!(ranked[0].score > 0.9 && ranked[0].score <= 1.0);
    }

    #[tokio::test]
    async fn scores_stay_in_cosine_range() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("q", vec![1.0, 0.0])
            .with_response("same", vec![2.0, 0.0])
            .with_response("opposite", vec![-1.0, 0.0]);
        let candidates = vec!["same".to_string(), "opposite".to_string()];

        let ranked = ranker(provider).rank("q", &candidates, 10).await.unwrap();
        assert_eq!(ranked.len(), 2);
        for candidate in &ranked {
            assert!(candidate.score >= -1.0 && candidate.score <= 1.0);
        }
        assert_eq!(ranked[0].text, "same");
        assert_eq!(ranked[1].text, "opposite");
    }

    #[tokio::test]
    async fn ties_keep_original_candidate_order() {
        let provider = MockEmbeddingProvider::with_dimensions(2)
            .with_response("q", vec![1.0, 0.0])
            .with_response("first", vec![0.5, 0.5])
            .with_response("second", vec![1.0, 1.0]);
        let candidates = vec!["first".to_string(), "second".to_string()];

        let ranked = ranker(provider).rank("q", &candidates, 2).await.unwrap();
        assert_eq!(ranked[0].text, "first");
        assert_eq!(ranked[1].text, "second");
    }

    #[tokio::test]
    async fn empty_candidates_skip_the_provider() {
        let ranked = ranker(MockEmbeddingProvider::failing())
            .rank("q", &[], 5)
            .await
            .unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_aborts_atomically() {
        let err = ranker(MockEmbeddingProvider::failing())
            .rank("q", &["a".to_string()], 5)
            .await
            .unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }
}
