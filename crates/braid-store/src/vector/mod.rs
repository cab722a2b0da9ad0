//! Vector stores.

mod memory;

use async_trait::async_trait;

use crate::error::StoreError;

pub use memory::MemoryVectorStore;

/// A store of dense vectors searchable by cosine distance.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert a vector under the given id, replacing any previous one.
    async fn insert(&self, id: u64, vector: Vec<f32>) -> Result<(), StoreError>;

    /// Insert many `(id, vector)` pairs.
    async fn insert_batch(&self, items: Vec<(u64, Vec<f32>)>) -> Result<(), StoreError> {
        for (id, vector) in items {
            self.insert(id, vector).await?;
        }
        Ok(())
    }

    /// Nearest neighbors of `query`: up to `k` ids with their cosine
    /// distance, closest first.
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u64, f32)>, StoreError>;

    /// Remove every stored vector.
    async fn clear(&self) -> Result<(), StoreError>;

    /// Number of stored vectors.
    async fn count(&self) -> Result<usize, StoreError>;
}
