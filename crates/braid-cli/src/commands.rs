use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use braid_core::{relpath, BraidConfig, Depth, FusionPolicy, RetrievalStrategy};
use braid_llm::{create_chat_provider, create_embedding_provider};
use braid_retrieval::{ChatEngine, GraphConstructor, Retriever};
use braid_store::{open_graph_store, ChunkIndex, EntityIndex, MemoryVectorStore};

pub fn parse(path: &str, json: bool) -> Result<()> {
    let triplets = relpath::parse(path)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&triplets)?);
    } else {
        for triplet in &triplets {
            println!("({}, {}, {})", triplet.source, triplet.relation, triplet.destination);
        }
    }
    Ok(())
}

pub async fn ingest(config: &BraidConfig, files: &[PathBuf]) -> Result<()> {
    let graph = open_graph_store(&config.graph).await?;
    let llm = create_chat_provider(&config.llm)?;
    let constructor = GraphConstructor::new(llm, graph.clone());

    let chunks = read_chunks(files)?;
    info!(files = files.len(), chunks = chunks.len(), "ingesting corpus");
    let extraction = constructor.ingest_all(&chunks).await?;

    println!(
        "Ingested {} chunk(s): {} entities, {} triplets ({} edges stored)",
        chunks.len(),
        extraction.entities.len(),
        extraction.triplets.len(),
        graph.triplet_count().await?,
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn query(
    config: &BraidConfig,
    question: &str,
    corpus: &[PathBuf],
    strategy: Option<RetrievalStrategy>,
    policy: Option<FusionPolicy>,
    depth: Option<Depth>,
    topk: Option<usize>,
    show_context: bool,
) -> Result<()> {
    let embedder = create_embedding_provider(&config.embedding)?;
    let llm = create_chat_provider(&config.llm)?;
    let graph = open_graph_store(&config.graph).await?;

    let chunk_index = Arc::new(ChunkIndex::new(
        Arc::new(MemoryVectorStore::new()),
        embedder.clone(),
    ));
    chunk_index.add_chunks(read_chunks(corpus)?).await?;

    let entity_index = Arc::new(EntityIndex::new(
        Arc::new(MemoryVectorStore::new()),
        embedder.clone(),
    ));
    entity_index.build(graph.entities().await?).await?;

    let mut settings = config.retrieval.clone();
    if let Some(strategy) = strategy {
        settings.strategy = strategy;
    }
    if let Some(policy) = policy {
        settings.policy = policy;
    }
    if let Some(depth) = depth {
        settings.depth = depth;
    }
    if let Some(topk) = topk {
        settings.topk = topk;
    }

    let retriever = Retriever::builder()
        .graph(graph)
        .chunks(chunk_index)
        .entity_index(entity_index)
        .embedder(embedder)
        .llm(llm.clone())
        .settings(settings)
        .build()?;
    let retriever = Arc::new(retriever);

    if show_context {
        let bundle = retriever.retrieve_configured(question).await?;
        println!("--- context ---");
        for line in bundle.context() {
            println!("{line}");
        }
        println!("---------------");
    }

    let engine = ChatEngine::new(retriever, llm);
    let answer = engine.answer(question).await?;
    println!("{answer}");
    Ok(())
}

/// Read files and split them into chunks on blank lines.
fn read_chunks(files: &[PathBuf]) -> Result<Vec<String>> {
    let mut chunks = Vec::new();
    for file in files {
        chunks.extend(chunk_text(&read_file(file)?));
    }
    Ok(chunks)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn chunk_text(text: &str) -> Vec<String> {
    text.split("\n\n")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(str::to_string)
        .collect()
}
