//! Deterministic in-process embedding provider for tests and offline runs.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::embeddings::EmbeddingProvider;
use crate::error::EmbeddingError;

/// Embedding provider that derives vectors by hashing the input text.
///
/// The same text always embeds to the same vector, and distinct texts
/// almost always differ, which is enough structure for ranking tests.
/// Specific texts can be pinned to chosen vectors with
/// [`with_response`](Self::with_response), and [`failing`](Self::failing)
/// builds a provider whose every call errors.
pub struct MockEmbeddingProvider {
    dimensions: usize,
    pinned: Mutex<HashMap<String, Vec<f32>>>,
    fail: bool,
}

impl MockEmbeddingProvider {
    /// Hash-based provider producing vectors of the given dimensionality.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self {
            dimensions,
            pinned: Mutex::new(HashMap::new()),
            fail: false,
        }
    }

    /// Pin a specific text to a specific vector.
    pub fn with_response(self, text: impl Into<String>, vector: Vec<f32>) -> Self {
        self.pinned
            .lock()
            .expect("mock embedding map poisoned")
            .insert(text.into(), vector);
        self
    }

    /// Provider whose every call fails, for error-path tests.
    pub fn failing() -> Self {
        Self {
            dimensions: 0,
            pinned: Mutex::new(HashMap::new()),
            fail: true,
        }
    }

    fn hash_vector(&self, text: &str) -> Vec<f32> {
        (0..self.dimensions)
            .map(|i| {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                i.hash(&mut hasher);
                // Map the hash into [-1, 1).
                (hasher.finish() % 2000) as f32 / 1000.0 - 1.0
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.fail {
            return Err(EmbeddingError::InvalidResponse(
                "mock provider configured to fail".to_string(),
            ));
        }
        if let Some(vector) = self
            .pinned
            .lock()
            .expect("mock embedding map poisoned")
            .get(text)
        {
            return Ok(vector.clone());
        }
        Ok(self.hash_vector(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_text_same_vector() {
        let provider = MockEmbeddingProvider::with_dimensions(8);
        let a = provider.embed("alpha").await.unwrap();
        let b = provider.embed("alpha").await.unwrap();
        let c = provider.embed("beta").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 8);
    }

    #[tokio::test]
    async fn pinned_response_wins() {
        let provider =
            MockEmbeddingProvider::with_dimensions(2).with_response("alpha", vec![1.0, 0.0]);
        assert_eq!(provider.embed("alpha").await.unwrap(), vec![1.0, 0.0]);
    }

    #[tokio::test]
    async fn failing_provider_errors() {
        let provider = MockEmbeddingProvider::failing();
        assert!(provider.embed("alpha").await.is_err());
    }
}
