//! Embedding index over graph entity names.
//!
//! Maps a question to its nearest known entities, which seed the graph
//! traversal. Entity names are sorted before indexing so ids are stable
//! for a given graph regardless of insertion order.

use std::sync::{Arc, RwLock};

use tracing::info;

use braid_llm::EmbeddingProvider;

use crate::error::StoreError;
use crate::vector::VectorStore;

/// Entities embedded and inserted per indexing round.
const INDEX_BATCH: usize = 400;

/// Nearest-entity lookup over a vector store.
pub struct EntityIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    id2entity: RwLock<Vec<String>>,
}

impl EntityIndex {
    /// An empty index over the given store and embedder.
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embedder,
            id2entity: RwLock::new(Vec::new()),
        }
    }

    /// Index the given entity names, replacing any previous contents.
    ///
    /// The backing store is cleared first so a smaller rebuild leaves no
    /// stale vectors occupying search slots.
    pub async fn build(&self, mut entities: Vec<String>) -> Result<(), StoreError> {
        entities.sort();
        entities.dedup();
        info!(entities = entities.len(), "building entity index");
        self.store.clear().await?;
        for (round, batch) in entities.chunks(INDEX_BATCH).enumerate() {
            let vectors = self.embedder.embed_batch(batch).await?;
            let base = (round * INDEX_BATCH) as u64;
            let items = vectors
                .into_iter()
                .enumerate()
                .map(|(i, v)| (base + i as u64, v))
                .collect();
            self.store.insert_batch(items).await?;
        }
        *self.id2entity.write().expect("entity index lock poisoned") = entities;
        Ok(())
    }

    /// The `k` entities nearest to the question, closest first.
    pub async fn lookup(&self, question: &str, k: usize) -> Result<Vec<String>, StoreError> {
        let query = self.embedder.embed(question).await?;
        let hits = self.store.search(&query, k).await?;
        let id2entity = self.id2entity.read().expect("entity index lock poisoned");
        Ok(hits
            .into_iter()
            .filter_map(|(id, _)| id2entity.get(id as usize).cloned())
            .collect())
    }

    /// Number of indexed entities.
    pub fn len(&self) -> usize {
        self.id2entity.read().expect("entity index lock poisoned").len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
