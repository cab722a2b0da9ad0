//! Answer generation over retrieval bundles.

use std::sync::Arc;
use std::sync::Mutex;

use tracing::warn;

use braid_core::{prompts, RetrievalStrategy};
use braid_llm::{ChatMessage, TextGenerationProvider};

use crate::error::RetrievalError;
use crate::pipeline::Retriever;

/// Conversational front end over the retrieval pipeline.
///
/// Retrieval runs with the pipeline's configured strategy; if the
/// graph-side machinery fails outright, the question is retried
/// vector-only rather than failing the query. Transcript history is
/// kept per engine and threaded into each completion.
pub struct ChatEngine {
    retriever: Arc<Retriever>,
    llm: Arc<dyn TextGenerationProvider>,
    history: Mutex<Vec<ChatMessage>>,
}

impl ChatEngine {
    /// An engine over the given pipeline and chat provider.
    pub fn new(retriever: Arc<Retriever>, llm: Arc<dyn TextGenerationProvider>) -> Self {
        Self {
            retriever,
            llm,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Answer a question from retrieved context.
    pub async fn answer(&self, question: &str) -> Result<String, RetrievalError> {
        let bundle = match self.retriever.retrieve_configured(question).await {
            Ok(bundle) => bundle,
            Err(err) => {
                warn!(%err, "retrieval failed, falling back to vector-only");
                let settings = self.retriever.settings();
                self.retriever
                    .retrieve(
                        question,
                        RetrievalStrategy::Vector,
                        settings.policy,
                        settings.depth,
                        settings.topk,
                    )
                    .await?
            }
        };

        let mut context = prompts::format_chunks(&bundle.chunks);
        if !bundle.paths.is_empty() {
            if !context.is_empty() {
                context.push('\n');
            }
            context.push_str(&prompts::format_paths(&bundle.paths));
        }

        let prompt = prompts::answer_prompt(&context, question);
        let history = self.history.lock().expect("chat history poisoned").clone();
        let reply = self.llm.complete(&prompt, &history).await?;

        let mut history = self.history.lock().expect("chat history poisoned");
        history.push(ChatMessage::user(question));
        history.push(ChatMessage::assistant(reply.clone()));
        Ok(reply)
    }

    /// Drop the transcript.
    pub fn clear_history(&self) {
        self.history.lock().expect("chat history poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::RetrievalSettings;
    use braid_llm::chat::MockChatProvider;
    use braid_llm::embeddings::MockEmbeddingProvider;
    use braid_store::{ChunkIndex, EntityIndex, GraphStore, MemoryGraphStore, MemoryVectorStore};

    async fn engine(llm: MockChatProvider) -> ChatEngine {
        let provider = Arc::new(
            MockEmbeddingProvider::with_dimensions(2)
                .with_response("capital of France?", vec![1.0, 0.0])
                .with_response("Paris is the capital of France.", vec![0.9, 0.1]),
        );
        let chunks = Arc::new(ChunkIndex::new(
            Arc::new(MemoryVectorStore::new()),
            provider.clone(),
        ));
        chunks
            .add_chunks(vec!["Paris is the capital of France.".to_string()])
            .await
            .unwrap();
        let entity_index = Arc::new(EntityIndex::new(
            Arc::new(MemoryVectorStore::new()),
            provider.clone(),
        ));
        entity_index.build(vec!["Paris".to_string()]).await.unwrap();

        let retriever = Retriever::builder()
            .graph(Arc::new(MemoryGraphStore::new()) as Arc<dyn GraphStore>)
            .chunks(chunks)
            .entity_index(entity_index)
            .embedder(provider)
            .settings(RetrievalSettings {
                entity_k: 1,
                ..Default::default()
            })
            .build()
            .unwrap();
        ChatEngine::new(Arc::new(retriever), Arc::new(llm))
    }

    #[tokio::test]
    async fn answer_threads_context_into_the_prompt() {
        // The mock echoes the prompt, so the reply carries the context.
        let engine = engine(MockChatProvider::new()).await;
        let reply = engine.answer("capital of France?").await.unwrap();
        assert!(reply.contains("Chunk1: Paris is the capital of France."));
        assert!(reply.contains("capital of France?"));
    }

    #[tokio::test]
    async fn history_accumulates_turns() {
        let engine = engine(MockChatProvider::new().with_reply("Paris.")).await;
        engine.answer("capital of France?").await.unwrap();
        assert_eq!(engine.history.lock().unwrap().len(), 2);
        engine.clear_history();
        assert!(engine.history.lock().unwrap().is_empty());
    }
}
