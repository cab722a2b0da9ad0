use thiserror::Error;

/// Storage backend failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Could not open or reach the backing database.
    #[error("store connection failed: {0}")]
    Connection(String),

    /// A graph query failed.
    #[error("graph query failed: {0}")]
    GraphQuery(String),

    /// A vector search failed.
    #[error("vector query failed: {0}")]
    VectorQuery(String),

    /// Stored data could not be (de)serialized.
    #[error("store serialization failed: {0}")]
    Serialization(String),

    /// The embedding provider failed while building an index.
    #[error(transparent)]
    Embedding(#[from] braid_llm::EmbeddingError),
}

impl From<surrealdb::Error> for StoreError {
    fn from(err: surrealdb::Error) -> Self {
        StoreError::GraphQuery(err.to_string())
    }
}
