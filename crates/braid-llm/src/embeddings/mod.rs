//! Embedding providers.

mod mock;
mod ollama;
mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use braid_core::{EmbeddingSettings, ProviderKind};

use crate::error::EmbeddingError;

pub use mock::MockEmbeddingProvider;
pub use ollama::OllamaEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;

/// Texts sent per upstream request when the provider supports batching.
pub(crate) const BATCH_SIZE: usize = 100;

/// A source of dense text embeddings.
///
/// Implementations must be deterministic per input within one session so
/// ranking stays reproducible across retries.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed many texts, preserving input order.
    ///
    /// The default walks the inputs one by one; providers with a batch
    /// endpoint override this.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }

    /// Dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

/// Build an embedding provider from settings.
pub fn create_embedding_provider(
    settings: &EmbeddingSettings,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    match settings.provider {
        ProviderKind::Ollama => Ok(Arc::new(OllamaEmbeddingProvider::new(settings)?)),
        ProviderKind::OpenAI => Ok(Arc::new(OpenAiEmbeddingProvider::new(settings)?)),
        ProviderKind::Mock => Ok(Arc::new(MockEmbeddingProvider::with_dimensions(
            settings.dimensions,
        ))),
    }
}
