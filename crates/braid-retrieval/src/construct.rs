//! Knowledge-graph construction from raw text.
//!
//! Each chunk of text goes to the LLM with a strict-JSON extraction
//! prompt. Generation output is occasionally malformed, so every chunk
//! gets a bounded number of attempts; exhausting them is a typed
//! failure, never the raw last reply.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use braid_core::{prompts, Triplet};
use braid_llm::TextGenerationProvider;
use braid_store::{GraphStore, StoreError};

/// Attempts per chunk before giving up.
const MAX_ATTEMPTS: usize = 3;

/// First JSON-object-looking blob in a reply, across lines.
static JSON_BLOB: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("json blob regex"));

/// Graph construction failure.
#[derive(Debug, Error)]
pub enum ConstructError {
    /// Every attempt at one chunk produced unusable output.
    #[error("extraction failed after {attempts} attempts: {last_error}")]
    AttemptsExhausted {
        /// Attempts spent.
        attempts: usize,
        /// What went wrong on the final attempt.
        last_error: String,
    },

    /// The graph store rejected an insert.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Entities and triplets extracted from one chunk of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Entity names, capitalized.
    pub entities: Vec<String>,
    /// Directed facts.
    pub triplets: Vec<Triplet>,
}

#[derive(Deserialize)]
struct RawExtraction {
    #[serde(default)]
    entities: Vec<String>,
    #[serde(default)]
    triplets: Vec<Vec<String>>,
}

/// Builds a knowledge graph from documents via LLM extraction.
pub struct GraphConstructor {
    llm: Arc<dyn TextGenerationProvider>,
    graph: Arc<dyn GraphStore>,
}

impl GraphConstructor {
    /// A constructor writing into the given graph store.
    pub fn new(llm: Arc<dyn TextGenerationProvider>, graph: Arc<dyn GraphStore>) -> Self {
        Self { llm, graph }
    }

    /// Extract entities and triplets from one chunk and insert the
    /// triplets into the graph.
    pub async fn ingest(&self, text: &str) -> Result<Extraction, ConstructError> {
        let mut last_error = String::new();
        for attempt in 1..=MAX_ATTEMPTS {
            let reply = match self.llm.complete(&prompts::extraction_prompt(text), &[]).await {
                Ok(reply) => reply,
                Err(err) => {
                    warn!(attempt, %err, "extraction request failed");
                    last_error = err.to_string();
                    continue;
                }
            };
            match parse_extraction(&reply) {
                Ok(extraction) => {
                    self.graph.insert_triplets(&extraction.triplets).await?;
                    info!(
                        entities = extraction.entities.len(),
                        triplets = extraction.triplets.len(),
                        "ingested chunk"
                    );
                    return Ok(extraction);
                }
                Err(err) => {
                    warn!(attempt, %err, "malformed extraction reply");
                    last_error = err;
                }
            }
        }
        Err(ConstructError::AttemptsExhausted {
            attempts: MAX_ATTEMPTS,
            last_error,
        })
    }

    /// Ingest many chunks, returning the union of their extractions.
    pub async fn ingest_all(&self, texts: &[String]) -> Result<Extraction, ConstructError> {
        let mut entities = Vec::new();
        let mut triplets = Vec::new();
        for text in texts {
            let extraction = self.ingest(text).await?;
            entities.extend(extraction.entities);
            triplets.extend(extraction.triplets);
        }
        entities.sort();
        entities.dedup();
        Ok(Extraction { entities, triplets })
    }
}

/// Pull the JSON object out of a reply and decode it.
fn parse_extraction(reply: &str) -> Result<Extraction, String> {
    let blob = JSON_BLOB
        .find(reply)
        .ok_or_else(|| "no JSON object in reply".to_string())?;
    let raw: RawExtraction =
        serde_json::from_str(blob.as_str()).map_err(|e| format!("bad JSON: {e}"))?;

    let mut triplets = Vec::with_capacity(raw.triplets.len());
    for parts in raw.triplets {
        let [source, relation, destination]: [String; 3] = parts
            .try_into()
            .map_err(|parts: Vec<String>| format!("triplet has {} fields", parts.len()))?;
        let triplet = Triplet::new(
            prompts::capitalize(source.trim()),
            relation.trim(),
            prompts::capitalize(destination.trim()),
        );
        if triplet.source.is_empty() || triplet.relation.is_empty() || triplet.destination.is_empty()
        {
            return Err("triplet with empty field".to_string());
        }
        triplets.push(triplet);
    }

    let entities = raw
        .entities
        .iter()
        .map(|e| prompts::capitalize(e.trim()))
        .filter(|e| !e.is_empty())
        .collect();
    Ok(Extraction { entities, triplets })
}
