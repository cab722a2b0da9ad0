use thiserror::Error;

/// Embedding provider failure.
///
/// Any variant aborts the ranking step that requested the embeddings;
/// partial results are never returned.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Transport-level failure talking to the provider.
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with something other than the expected shape.
    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),

    /// Provider settings are unusable (missing key, bad URL).
    #[error("embedding provider misconfigured: {0}")]
    Config(String),
}

/// Text-generation provider failure.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure talking to the provider.
    #[error("chat request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with something other than the expected shape.
    #[error("invalid chat response: {0}")]
    InvalidResponse(String),

    /// Provider settings are unusable (missing key, bad URL).
    #[error("chat provider misconfigured: {0}")]
    Config(String),
}
