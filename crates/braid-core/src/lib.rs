//! # Braid Core
//!
//! Core types and pure algorithms for the Braid hybrid retrieval pipeline.
//!
//! ## Modules
//!
//! - [`types`]: the retrieval data model (triplets, relation maps, bundles)
//! - [`relpath`]: parser for the arrow-annotated relation-path grammar
//! - [`fusion`]: Union / Intersection merging of vector and graph results
//! - [`prompts`]: prompt templates for keyword extraction and answering
//! - [`config`]: TOML configuration shared by the pipeline crates
//!
//! Everything in this crate is synchronous and free of I/O; the network
//! seams (embedding, generation, stores) live in `braid-llm` and
//! `braid-store`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fusion;
pub mod prompts;
pub mod relpath;
pub mod types;

pub use config::{
    BraidConfig, EmbeddingSettings, ExtractionStrategy, GraphBackend, LlmSettings,
    ProviderKind, RetrievalSettings, VectorBackend, VectorSettings,
};
pub use error::{ConfigError, RelationParseError};
pub use fusion::merge;
pub use relpath::parse;
pub use types::{
    Depth, FusionPolicy, RelationMap, RetrievalBundle, RetrievalStrategy, ScoredCandidate, Triplet,
};
