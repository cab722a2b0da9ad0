//! Transient in-process vector store with brute-force cosine search.

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::vector::VectorStore;

/// In-memory vector store. Search is an exact linear scan.
#[derive(Default)]
pub struct MemoryVectorStore {
    rows: RwLock<Vec<(u64, Vec<f32>)>>,
}

impl MemoryVectorStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert(&self, id: u64, vector: Vec<f32>) -> Result<(), StoreError> {
        let mut rows = self.rows.write().expect("vector store lock poisoned");
        match rows.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, existing)) => *existing = vector,
            None => rows.push((id, vector)),
        }
        Ok(())
    }

    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<(u64, f32)>, StoreError> {
        let rows = self.rows.read().expect("vector store lock poisoned");
        if let Some((_, vector)) = rows.iter().find(|(_, v)| v.len() != query.len()) {
            return Err(StoreError::VectorQuery(format!(
                "query has {} dimensions, stored vector has {}",
                query.len(),
                vector.len()
            )));
        }
        let mut scored: Vec<(u64, f32)> = rows
            .iter()
            .map(|(id, vector)| (*id, cosine_distance(query, vector)))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(k);
        Ok(scored)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.rows.write().expect("vector store lock poisoned").clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.rows.read().expect("vector store lock poisoned").len())
    }
}
