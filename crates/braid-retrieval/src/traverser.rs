//! Graph traversal with recoverable failure.

use std::sync::Arc;

use tracing::warn;

use braid_core::{Depth, RelationMap};
use braid_store::GraphStore;

/// Walks relation paths out of seed entities and strips store-specific
/// label decoration from the results.
///
/// Traversal failures are recovered into an empty map: a dead graph
/// store costs the query its graph-side evidence, never the query.
pub struct GraphTraverser {
    store: Arc<dyn GraphStore>,
}

impl GraphTraverser {
    /// A traverser over the given graph store.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Relation paths for the seeds, up to `depth` hops, at most `limit`
    /// paths across the whole call.
    pub async fn traverse(&self, entities: &[String], depth: Depth, limit: usize) -> RelationMap {
        match self.store.get_rel_map(entities, depth, limit).await {
            Ok(map) => self.store.clean_rel_map(map),
            Err(err) => {
                warn!(%err, "graph traversal failed, continuing without graph evidence");
                RelationMap::default()
            }
        }
    }
}
