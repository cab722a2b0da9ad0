//! # Braid Retrieval
//!
//! The query pipeline: resolve a question to seed entities, walk
//! relation paths out of the knowledge graph, prune them by embedding
//! similarity, and fuse them with vector-retrieved chunks into one
//! retrieval bundle. Also hosts graph construction from raw text and
//! the chat glue that turns bundles into answers.

#![warn(missing_docs)]

mod chat;
mod construct;
mod error;
mod extractor;
mod pipeline;
mod pruner;
mod ranker;
mod traverser;

pub use chat::ChatEngine;
pub use construct::{ConstructError, Extraction, GraphConstructor};
pub use error::RetrievalError;
pub use extractor::EntityExtractor;
pub use pipeline::{Retriever, RetrieverBuilder};
pub use pruner::KnowledgePruner;
pub use ranker::SimilarityRanker;
pub use traverser::GraphTraverser;
