//! # Braid LLM
//!
//! Embedding and text-generation providers behind object-safe async
//! traits, so the retrieval pipeline can be wired to Ollama, an
//! OpenAI-compatible API, or a deterministic in-process mock without
//! caring which.

#![warn(missing_docs)]

pub mod chat;
pub mod embeddings;
mod error;

pub use chat::{create_chat_provider, ChatMessage, TextGenerationProvider};
pub use embeddings::{create_embedding_provider, EmbeddingProvider};
pub use error::{EmbeddingError, LlmError};
