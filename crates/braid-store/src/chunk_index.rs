//! Embedding index over passage chunks, the vector side of retrieval.

use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::info;

use braid_llm::EmbeddingProvider;

use crate::error::StoreError;
use crate::vector::VectorStore;

/// Chunk text retrieval over a vector store.
pub struct ChunkIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    chunks: RwLock<Vec<String>>,
    // serializes id assignment; the chunks guard is never held across an await
    write_gate: Mutex<()>,
}

impl ChunkIndex {
    /// An empty index over the given store and embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            chunks: RwLock::new(Vec::new()),
            write_gate: Mutex::new(()),
        }
    }

    /// Embed and index chunks, appending to what is already stored.
    pub async fn add_chunks(&self, texts: Vec<String>) -> Result<(), StoreError> {
        if texts.is_empty() {
            return Ok(());
        }
        let vectors = self.embedder.embed_batch(&texts).await?;
        let _writer = self.write_gate.lock().await;
        let base = self.len() as u64;
        let items = vectors
            .into_iter()
            .enumerate()
            .map(|(i, v)| (base + i as u64, v))
            .collect();
        self.store.insert_batch(items).await?;
        let mut chunks = self.chunks.write().expect("chunk index lock poisoned");
        info!(added = texts.len(), total = chunks.len() + texts.len(), "indexed chunks");
        chunks.extend(texts);
        Ok(())
    }

    /// The `k` chunks nearest to the question, closest first.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<Vec<String>, StoreError> {
        let query = self.embedder.embed(question).await?;
        let hits = self.store.search(&query, k).await?;
        let chunks = self.chunks.read().expect("chunk index lock poisoned");
        Ok(hits
            .into_iter()
            .filter_map(|(id, _)| chunks.get(id as usize).cloned())
            .collect())
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.chunks.read().expect("chunk index lock poisoned").len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
