//! Retrieval data model
//!
//! All values here are created fresh per query and dropped once the final
//! bundle has been consumed; nothing in this module is shared across queries.

use serde::{Deserialize, Serialize};

/// A directed (source, relation, destination) fact extracted from a
/// relation path.
///
/// Fields are trimmed, non-empty strings; direction follows the arrow that
/// produced the triplet (`A -R-> B` yields source `A`, destination `B`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triplet {
    /// Head entity of the directed edge.
    pub source: String,
    /// Relation label.
    pub relation: String,
    /// Tail entity of the directed edge.
    pub destination: String,
}

impl Triplet {
    /// Build a triplet, trimming surrounding whitespace from each field.
    pub fn new(
        source: impl Into<String>,
        relation: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into().trim().to_string(),
            relation: relation.into().trim().to_string(),
            destination: destination.into().trim().to_string(),
        }
    }

    /// The three fields in (source, relation, destination) order.
    pub fn fields(&self) -> [&str; 3] {
        [&self.source, &self.relation, &self.destination]
    }
}

impl std::fmt::Display for Triplet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -{}-> {}", self.source, self.relation, self.destination)
    }
}

/// Relation paths returned by one graph query, keyed by seed entity.
///
/// Entry order is traversal order. A seed with no matches keeps an entry
/// with an empty path list rather than disappearing from the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationMap {
    entries: Vec<(String, Vec<String>)>,
}

impl RelationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert paths for a seed entity; repeated inserts for the same seed
    /// extend the existing path list.
    pub fn insert(&mut self, entity: impl Into<String>, paths: Vec<String>) {
        let entity = entity.into();
        match self.entries.iter_mut().find(|(e, _)| *e == entity) {
            Some((_, existing)) => existing.extend(paths),
            None => self.entries.push((entity, paths)),
        }
    }

    /// Absorb another map, preserving its entry order.
    pub fn merge(&mut self, other: RelationMap) {
        for (entity, paths) in other.entries {
            self.insert(entity, paths);
        }
    }

    /// All paths across all seeds, in insertion order, duplicates kept.
    pub fn flatten(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|(_, paths)| paths.iter().cloned())
            .collect()
    }

    /// Iterate over `(seed, paths)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(e, p)| (e.as_str(), p.as_slice()))
    }

    /// Number of seed entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the map holds no seed entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of paths across all seeds.
    pub fn path_count(&self) -> usize {
        self.entries.iter().map(|(_, p)| p.len()).sum()
    }

    /// Rewrite every seed label and path with `f`, keeping entry order.
    pub fn map_strings<F>(self, mut f: F) -> RelationMap
    where
        F: FnMut(&str) -> String,
    {
        RelationMap {
            entries: self
                .entries
                .into_iter()
                .map(|(entity, paths)| {
                    let entity = f(&entity);
                    let paths = paths.iter().map(|p| f(p)).collect();
                    (entity, paths)
                })
                .collect(),
        }
    }
}

impl FromIterator<(String, Vec<String>)> for RelationMap {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        let mut map = RelationMap::new();
        for (entity, paths) in iter {
            map.insert(entity, paths);
        }
        map
    }
}

/// A candidate text with its cosine similarity to the query embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// Relation path or passage chunk.
    pub text: String,
    /// Cosine similarity in `[-1, 1]`.
    pub score: f32,
}

impl ScoredCandidate {
    /// Pair a candidate text with its score.
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
        }
    }
}

/// Per-query retrieval output: passage chunks from the vector side and
/// pruned relation paths from the graph side, both in relevance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RetrievalBundle {
    /// Passage chunks from vector search.
    pub chunks: Vec<String>,
    /// Pruned relation paths from graph traversal, post fusion policy.
    pub paths: Vec<String>,
}

impl RetrievalBundle {
    /// Bundle chunks and paths.
    pub fn new(chunks: Vec<String>, paths: Vec<String>) -> Self {
        Self { chunks, paths }
    }

    /// Combined context in chunk-then-path order, for prompting.
    pub fn context(&self) -> Vec<String> {
        self.chunks.iter().chain(self.paths.iter()).cloned().collect()
    }

    /// True when neither side contributed anything.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty() && self.paths.is_empty()
    }
}

/// How vector chunks and graph paths are combined into one context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionPolicy {
    /// Ordered concatenation of chunks and paths, no deduplication.
    Union,
    /// Keep only paths whose every triplet field appears in some chunk.
    Intersection,
}

impl std::fmt::Display for FusionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FusionPolicy::Union => write!(f, "union"),
            FusionPolicy::Intersection => write!(f, "intersection"),
        }
    }
}

/// Which retrieval sides feed the final bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetrievalStrategy {
    /// Vector search only.
    Vector,
    /// Graph traversal only.
    Graph,
    /// Both sides, fused under the configured policy.
    Hybrid,
}

impl std::fmt::Display for RetrievalStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalStrategy::Vector => write!(f, "vector"),
            RetrievalStrategy::Graph => write!(f, "graph"),
            RetrievalStrategy::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Graph traversal depth. The pipeline supports one- and two-hop
/// traversal only; deeper chains are out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Depth {
    /// Single-hop traversal.
    One,
    /// Two-hop traversal.
    Two,
}

impl Depth {
    /// Number of hops.
    pub fn hops(self) -> usize {
        match self {
            Depth::One => 1,
            Depth::Two => 2,
        }
    }
}

impl TryFrom<u8> for Depth {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Depth::One),
            2 => Ok(Depth::Two),
            other => Err(format!("traversal depth must be 1 or 2, got {other}")),
        }
    }
}

impl From<Depth> for u8 {
    fn from(depth: Depth) -> u8 {
        depth.hops() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triplet_new_trims_fields() {
        let t = Triplet::new(" Paris ", " CapitalOf ", " France ");
        assert_eq!(t.source, "Paris");
        assert_eq!(t.relation, "CapitalOf");
        assert_eq!(t.destination, "France");
        assert_eq!(t.to_string(), "Paris -CapitalOf-> France");
    }

    #[test]
    fn relation_map_keeps_insertion_order_and_duplicates() {
        let mut map = RelationMap::new();
        map.insert("A", vec!["A -R-> B".to_string()]);
        map.insert("C", vec!["C -R-> B".to_string(), "A -R-> B".to_string()]);
        map.insert("A", vec!["A -S-> D".to_string()]);

        assert_eq!(map.len(), 2);
        assert_eq!(map.path_count(), 4);
        assert_eq!(
            map.flatten(),
            vec!["A -R-> B", "A -S-> D", "C -R-> B", "A -R-> B"]
        );
    }

    #[test]
    fn relation_map_empty_seed_entry_is_kept() {
        let mut map = RelationMap::new();
        map.insert("NoMatches", Vec::new());
        assert!(!map.is_empty());
        assert_eq!(map.path_count(), 0);
        assert!(map.flatten().is_empty());
    }

    #[test]
    fn depth_round_trips_through_u8() {
        assert_eq!(Depth::try_from(1u8), Ok(Depth::One));
        assert_eq!(Depth::try_from(2u8), Ok(Depth::Two));
        assert!(Depth::try_from(3u8).is_err());
        assert_eq!(u8::from(Depth::Two), 2);
    }

    #[test]
    fn bundle_context_is_chunks_then_paths() {
        let bundle = RetrievalBundle::new(
            vec!["chunk".to_string()],
            vec!["A -R-> B".to_string()],
        );
        assert_eq!(bundle.context(), vec!["chunk", "A -R-> B"]);
        assert!(!bundle.is_empty());
    }
}
