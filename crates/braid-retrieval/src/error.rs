use thiserror::Error;

/// Pipeline failure.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// An embedding call failed; the ranking that needed it was aborted
    /// without producing a partial result.
    #[error(transparent)]
    Embedding(#[from] braid_llm::EmbeddingError),

    /// A text-generation call failed.
    #[error(transparent)]
    Llm(#[from] braid_llm::LlmError),

    /// A storage backend failed.
    #[error(transparent)]
    Store(#[from] braid_store::StoreError),

    /// A relation path did not match the arrow grammar.
    #[error(transparent)]
    Parse(#[from] braid_core::RelationParseError),

    /// No entities could be resolved from the question.
    ///
    /// Recovered inside the pipeline into an empty graph-side result;
    /// only surfaced by direct extractor calls.
    #[error("no entities resolved from question")]
    NoEntities,
}
