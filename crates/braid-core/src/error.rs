//! Error types for the core crate.

use thiserror::Error;

/// A relation path did not match the arrow grammar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelationParseError {
    /// No `->` or `<-` token anywhere in the path.
    #[error("no hop pattern in relation path: {path:?}")]
    NoHop {
        /// The offending path text.
        path: String,
    },

    /// Arrow and boundary-dash counts disagree, so hops cannot be paired.
    #[error("relation path has {arrows} arrow(s) but {dashes} boundary dash(es): {path:?}")]
    UnpairedBoundary {
        /// Arrow tokens found.
        arrows: usize,
        /// Boundary dashes found.
        dashes: usize,
        /// The offending path text.
        path: String,
    },

    /// A hop's dash and arrow are ordered inconsistently with its direction.
    #[error("hop {hop} is malformed in relation path: {path:?}")]
    MalformedHop {
        /// Zero-based hop index.
        hop: usize,
        /// The offending path text.
        path: String,
    },

    /// An entity or relation substring trimmed down to nothing.
    #[error("empty {field} in hop {hop} of relation path: {path:?}")]
    EmptyField {
        /// Which triplet field was empty.
        field: &'static str,
        /// Zero-based hop index.
        hop: usize,
        /// The offending path text.
        path: String,
    },
}

/// Configuration loading or validation failure.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Could not read the config file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file was not valid TOML for [`crate::config::BraidConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Structurally valid TOML with an unusable value.
    #[error("invalid config: {0}")]
    Invalid(String),
}
