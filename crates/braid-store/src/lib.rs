//! # Braid Store
//!
//! Storage backends for the retrieval pipeline: a knowledge-graph store
//! that walks relation paths in the arrow grammar, a vector store with
//! cosine nearest-neighbor search, and the entity and chunk indexes
//! layered on top of it.

#![warn(missing_docs)]

mod chunk_index;
mod entity_index;
mod error;
pub mod graph;
pub mod vector;

pub use chunk_index::ChunkIndex;
pub use entity_index::EntityIndex;
pub use error::StoreError;
pub use graph::{open_graph_store, GraphStore, MemoryGraphStore, SurrealGraphStore};
pub use vector::{MemoryVectorStore, VectorStore};
