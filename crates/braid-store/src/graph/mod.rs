//! Knowledge-graph stores.
//!
//! A graph store holds directed `(source, relation, destination)` edges
//! and renders traversals as relation paths in the arrow grammar:
//! outgoing hops as `A -rel-> B`, incoming hops as `B <-rel- A`.

mod memory;
mod surreal;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use braid_core::{Depth, GraphBackend, RelationMap, Triplet};

use crate::error::StoreError;

pub use memory::MemoryGraphStore;
pub use surreal::SurrealGraphStore;

/// `{name: X}` decoration some property-graph stores append to labels.
static NAME_DECOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{name: [^{}]*\}").expect("name decoration regex"));

/// `[relationship:{relationship: X}]` decoration around relation labels.
static REL_DECOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[relationship:\{relationship: ([^{}]+)\}\]").expect("relation decoration regex")
});

/// Strip store-specific label decoration from one path, leaving the
/// arrow grammar intact.
pub fn clean_path(path: &str) -> String {
    let path = NAME_DECOR.replace_all(path, "");
    REL_DECOR.replace_all(&path, "$1").into_owned()
}

/// `entity -> [(relation, neighbor)]` adjacency, insertion order kept.
pub(crate) type Adjacency = HashMap<String, Vec<(String, String)>>;

/// Walk relation paths out of each seed over prebuilt adjacency lists.
///
/// Outgoing hops render as `A -rel-> B`, incoming as `A <-rel- B`.
/// Depth two extends each hop once more in the same direction. Every
/// seed gets an entry, empty when it has no edges. `limit` caps the
/// total paths across the whole call, so late seeds may come up empty
/// against a dense graph.
pub(crate) fn walk_paths(
    outgoing: &Adjacency,
    incoming: &Adjacency,
    seeds: &[String],
    depth: Depth,
    limit: usize,
) -> RelationMap {
    let mut map = RelationMap::default();
    let mut budget = limit;
    for seed in seeds {
        let mut paths = Vec::new();
        let out = outgoing.get(seed).map(Vec::as_slice).unwrap_or(&[]);
        let inc = incoming.get(seed).map(Vec::as_slice).unwrap_or(&[]);

        for (rel, dst) in out {
            paths.push(format!("{seed} -{rel}-> {dst}"));
            if depth == Depth::Two {
                for (rel2, dst2) in outgoing.get(dst).map(Vec::as_slice).unwrap_or(&[]) {
                    paths.push(format!("{seed} -{rel}-> {dst} -{rel2}-> {dst2}"));
                }
            }
        }
        for (rel, src) in inc {
            paths.push(format!("{seed} <-{rel}- {src}"));
            if depth == Depth::Two {
                for (rel2, src2) in incoming.get(src).map(Vec::as_slice).unwrap_or(&[]) {
                    paths.push(format!("{seed} <-{rel}- {src} <-{rel2}- {src2}"));
                }
            }
        }

        paths.truncate(budget);
        budget -= paths.len();
        map.insert(seed.clone(), paths);
    }
    map
}

/// A store of directed knowledge-graph edges.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Insert one edge. Duplicate edges are ignored.
    async fn insert_triplet(&self, triplet: &Triplet) -> Result<(), StoreError>;

    /// Insert many edges.
    async fn insert_triplets(&self, triplets: &[Triplet]) -> Result<(), StoreError> {
        for triplet in triplets {
            self.insert_triplet(triplet).await?;
        }
        Ok(())
    }

    /// All entity names known to the graph, sorted and deduplicated.
    async fn entities(&self) -> Result<Vec<String>, StoreError>;

    /// Number of stored edges.
    async fn triplet_count(&self) -> Result<usize, StoreError>;

    /// Walk relation paths out of each seed entity, up to `depth` hops,
    /// at most `limit` paths across the whole call.
    ///
    /// Every seed gets an entry in the returned map, empty when the
    /// entity is unknown or isolated.
    async fn get_rel_map(
        &self,
        entities: &[String],
        depth: Depth,
        limit: usize,
    ) -> Result<RelationMap, StoreError>;

    /// Strip store-specific decoration from every label in the map.
    fn clean_rel_map(&self, map: RelationMap) -> RelationMap {
        map.map_strings(|s| clean_path(s))
    }
}

/// Open the graph store named by the config.
pub async fn open_graph_store(backend: &GraphBackend) -> Result<Arc<dyn GraphStore>, StoreError> {
    match backend {
        GraphBackend::Memory => Ok(Arc::new(MemoryGraphStore::new())),
        GraphBackend::Surreal { path } => Ok(Arc::new(SurrealGraphStore::open(path).await?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_strips_decoration() {
        let decorated =
            "Paris{name: Paris} -[relationship:{relationship: CapitalOf}]-> France{name: France}";
        assert_eq!(clean_path(decorated), "Paris -CapitalOf-> France");
    }

    #[test]
    fn clean_path_leaves_plain_paths_alone() {
        let plain = "Paris -CapitalOf-> France";
        assert_eq!(clean_path(plain), plain);
    }
}
