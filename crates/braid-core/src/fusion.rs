//! Fusion of graph paths with vector-retrieved chunks.
//!
//! Hybrid retrieval produces two candidate sets: text chunks ranked by
//! embedding similarity and relation paths walked out of the knowledge
//! graph. [`merge`] combines them under a [`FusionPolicy`]:
//!
//! * `Union` keeps every path alongside every chunk.
//! * `Intersection` keeps only paths corroborated by the chunks: each
//!   entity and relation of the path must occur, case-insensitively, in
//!   at least one chunk. Paths that fail to parse are dropped.

use tracing::debug;

use crate::relpath;
use crate::types::{FusionPolicy, RetrievalBundle};

/// Merge ranked chunks and relation paths into one bundle.
///
/// Input order is preserved for both sides; `Intersection` only ever
/// removes paths, never reorders them.
pub fn merge(chunks: Vec<String>, paths: Vec<String>, policy: FusionPolicy) -> RetrievalBundle {
    let paths = match policy {
        FusionPolicy::Union => paths,
        FusionPolicy::Intersection => intersect(&chunks, paths),
    };
    RetrievalBundle { chunks, paths }
}

/// Keep the paths whose every triplet field is grounded in some chunk.
fn intersect(chunks: &[String], paths: Vec<String>) -> Vec<String> {
    let normalized: Vec<String> = chunks.iter().map(|c| normalize(c)).collect();
    paths
        .into_iter()
        .filter(|path| match relpath::parse(path) {
            Ok(triplets) => triplets.iter().all(|triplet| {
                triplet
                    .fields()
                    .iter()
                    .all(|field| contains_field(&normalized, field))
            }),
            Err(err) => {
                debug!(%path, %err, "dropping unparseable relation path during fusion");
                false
            }
        })
        .collect()
}

/// Lowercase and strip whitespace, so camel-case relation labels like
/// `CapitalOf` match their prose spelling `capital of`.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn contains_field(normalized_chunks: &[String], field: &str) -> bool {
    let needle = normalize(field);
    normalized_chunks.iter().any(|chunk| chunk.contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunks() -> Vec<String> {
        vec![
            "Paris is the capital of France.".to_string(),
            "Berlin has a famous wall.".to_string(),
        ]
    }

    #[test]
    fn union_keeps_everything_in_order() {
        let paths = vec![
            "Paris -CapitalOf-> France".to_string(),
            "Mars -OrbitedBy-> Phobos".to_string(),
        ];
        let bundle = merge(chunks(), paths.clone(), FusionPolicy::Union);
        assert_eq!(bundle.paths, paths);
        assert_eq!(bundle.chunks, chunks());
    }

    #[test]
    fn intersection_keeps_corroborated_paths() {
        // CapitalOf matches the prose "capital of" across the space.
        let paths = vec![
            "Paris -CapitalOf-> France".to_string(),
            "Mars -OrbitedBy-> Phobos".to_string(),
        ];
        let bundle = merge(chunks(), paths, FusionPolicy::Intersection);
        assert_eq!(bundle.paths, vec!["Paris -CapitalOf-> France".to_string()]);
    }

    #[test]
    fn intersection_on_unrelated_chunks_is_empty() {
        let bundle = merge(
            vec!["unrelated text".to_string()],
            vec!["Tom -Knows-> Bob".to_string()],
            FusionPolicy::Intersection,
        );
        assert!(bundle.paths.is_empty());
    }

    #[test]
    fn intersection_matching_is_case_insensitive() {
        let paths = vec!["PARIS -capital-> FRANCE".to_string()];
        let bundle = merge(chunks(), paths, FusionPolicy::Intersection);
        assert_eq!(bundle.paths.len(), 1);
    }

    #[test]
    fn intersection_requires_every_hop() {
        // Second hop mentions an entity absent from the chunks.
        let paths = vec!["Paris -Capital-> France -Borders-> Atlantis".to_string()];
        let bundle = merge(chunks(), paths, FusionPolicy::Intersection);
        assert!(bundle.paths.is_empty());
    }

    #[test]
    fn intersection_drops_unparseable_paths() {
        let paths = vec![
            "not a relation path".to_string(),
            "Paris -Capital-> France".to_string(),
        ];
        let bundle = merge(chunks(), paths, FusionPolicy::Intersection);
        assert_eq!(bundle.paths, vec!["Paris -Capital-> France".to_string()]);
    }

    #[test]
    fn intersection_with_no_chunks_drops_all_paths() {
        let paths = vec!["Paris -Capital-> France".to_string()];
        let bundle = merge(Vec::new(), paths, FusionPolicy::Intersection);
        assert!(bundle.paths.is_empty());
        assert!(bundle.chunks.is_empty());
    }
}
