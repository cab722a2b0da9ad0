//! Embedded SurrealDB graph store.
//!
//! Edges live in a `triplet` table with a content-derived record id, so
//! re-inserting the same edge is a no-op. Traversal loads the adjacency
//! into memory and reuses the shared path walk; graphs built per corpus
//! are small enough that this beats round-tripping a multi-hop query.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;
use tracing::debug;

use braid_core::{Depth, RelationMap, Triplet};

use crate::error::StoreError;
use crate::graph::{walk_paths, Adjacency, GraphStore};

const TABLE: &str = "triplet";

/// Graph store backed by an embedded SurrealDB database.
pub struct SurrealGraphStore {
    db: Surreal<Db>,
}

#[derive(Serialize, Deserialize)]
struct TripletRow {
    source: String,
    relation: String,
    destination: String,
}

impl From<TripletRow> for Triplet {
    fn from(row: TripletRow) -> Self {
        Triplet::new(row.source, row.relation, row.destination)
    }
}

fn record_id(triplet: &Triplet) -> String {
    let mut hasher = DefaultHasher::new();
    triplet.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

impl SurrealGraphStore {
    /// Open a persistent store under the given directory.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| StoreError::Connection(format!("failed to open graph db: {e}")))?;
        Self::init(db).await
    }

    /// Open a transient in-memory store.
    pub async fn new_memory() -> Result<Self, StoreError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| StoreError::Connection(format!("failed to open graph db: {e}")))?;
        Self::init(db).await
    }

    async fn init(db: Surreal<Db>) -> Result<Self, StoreError> {
        db.use_ns("braid")
            .use_db("graph")
            .await
            .map_err(|e| StoreError::Connection(format!("failed to select namespace: {e}")))?;
        Ok(Self { db })
    }

    async fn all_triplets(&self) -> Result<Vec<Triplet>, StoreError> {
        let rows: Vec<TripletRow> = self.db.select(TABLE).await?;
        Ok(rows.into_iter().map(Triplet::from).collect())
    }
}

#[async_trait]
impl GraphStore for SurrealGraphStore {
    async fn insert_triplet(&self, triplet: &Triplet) -> Result<(), StoreError> {
        let _: Option<TripletRow> = self
            .db
            .upsert((TABLE, record_id(triplet)))
            .content(TripletRow {
                source: triplet.source.clone(),
                relation: triplet.relation.clone(),
                destination: triplet.destination.clone(),
            })
            .await?;
        Ok(())
    }

    async fn entities(&self) -> Result<Vec<String>, StoreError> {
        let triplets = self.all_triplets().await?;
        let names: BTreeSet<String> = triplets
            .into_iter()
            .flat_map(|t| [t.source, t.destination])
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn triplet_count(&self) -> Result<usize, StoreError> {
        Ok(self.all_triplets().await?.len())
    }

    async fn get_rel_map(
        &self,
        entities: &[String],
        depth: Depth,
        limit: usize,
    ) -> Result<RelationMap, StoreError> {
        let triplets = self.all_triplets().await?;
        let mut outgoing = Adjacency::new();
        let mut incoming = Adjacency::new();
        for t in &triplets {
            outgoing
                .entry(t.source.clone())
                .or_default()
                .push((t.relation.clone(), t.destination.clone()));
            incoming
                .entry(t.destination.clone())
                .or_default()
                .push((t.relation.clone(), t.source.clone()));
        }
        let map = walk_paths(&outgoing, &incoming, entities, depth, limit);
        debug!(seeds = entities.len(), paths = map.path_count(), "walked relation paths");
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str, r: &str, d: &str) -> Triplet {
        Triplet::new(s, r, d)
    }

    #[tokio::test]
    async fn insert_is_idempotent() {
        let store = SurrealGraphStore::new_memory().await.unwrap();
        store.insert_triplet(&t("A", "R", "B")).await.unwrap();
        store.insert_triplet(&t("A", "R", "B")).await.unwrap();
        assert_eq!(store.triplet_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn traversal_matches_arrow_grammar() {
        let store = SurrealGraphStore::new_memory().await.unwrap();
        store
            .insert_triplets(&[
                t("Paris", "CapitalOf", "France"),
                t("France", "MemberOf", "EU"),
            ])
            .await
            .unwrap();
        let map = store
            .get_rel_map(&["Paris".to_string()], Depth::Two, 10)
            .await
            .unwrap();
        let paths = map.flatten();
        assert!(paths.contains(&"Paris -CapitalOf-> France".to_string()));
        assert!(paths.contains(&"Paris -CapitalOf-> France -MemberOf-> EU".to_string()));
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph");
        {
            let store = SurrealGraphStore::open(&path).await.unwrap();
            store.insert_triplet(&t("A", "R", "B")).await.unwrap();
        }
        let store = SurrealGraphStore::open(&path).await.unwrap();
        assert_eq!(store.triplet_count().await.unwrap(), 1);
        assert_eq!(store.entities().await.unwrap(), vec!["A", "B"]);
    }
}
