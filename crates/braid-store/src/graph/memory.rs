//! Transient in-process graph store.

use std::collections::{BTreeSet, HashSet};
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use braid_core::{Depth, RelationMap, Triplet};

use crate::error::StoreError;
use crate::graph::{walk_paths, Adjacency, GraphStore};

#[derive(Default)]
struct Inner {
    edges: HashSet<Triplet>,
    outgoing: Adjacency,
    incoming: Adjacency,
}

/// In-memory graph store with adjacency-list traversal.
#[derive(Default)]
pub struct MemoryGraphStore {
    inner: RwLock<Inner>,
}

impl MemoryGraphStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GraphStore for MemoryGraphStore {
    async fn insert_triplet(&self, triplet: &Triplet) -> Result<(), StoreError> {
        let mut inner = self.inner.write().expect("graph store lock poisoned");
        if !inner.edges.insert(triplet.clone()) {
            return Ok(());
        }
        inner
            .outgoing
            .entry(triplet.source.clone())
            .or_default()
            .push((triplet.relation.clone(), triplet.destination.clone()));
        inner
            .incoming
            .entry(triplet.destination.clone())
            .or_default()
            .push((triplet.relation.clone(), triplet.source.clone()));
        Ok(())
    }

    async fn entities(&self) -> Result<Vec<String>, StoreError> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let names: BTreeSet<&String> = inner
            .edges
            .iter()
            .flat_map(|t| [&t.source, &t.destination])
            .collect();
        Ok(names.into_iter().cloned().collect())
    }

    async fn triplet_count(&self) -> Result<usize, StoreError> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        Ok(inner.edges.len())
    }

    async fn get_rel_map(
        &self,
        entities: &[String],
        depth: Depth,
        limit: usize,
    ) -> Result<RelationMap, StoreError> {
        let inner = self.inner.read().expect("graph store lock poisoned");
        let map = walk_paths(&inner.outgoing, &inner.incoming, entities, depth, limit);
        debug!(seeds = entities.len(), paths = map.path_count(), "walked relation paths");
        Ok(map)
    }
}
