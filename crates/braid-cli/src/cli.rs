use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use braid_core::{Depth, FusionPolicy, RetrievalStrategy};

#[derive(Parser)]
#[command(name = "braid")]
#[command(about = "braid - hybrid graph/vector retrieval over your documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path (TOML). Defaults are used when omitted.
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a relation path into its triplets
    Parse {
        /// A path in the arrow grammar, e.g. "Paris -CapitalOf-> France"
        path: String,

        /// Emit JSON instead of one triplet per line
        #[arg(long)]
        json: bool,
    },

    /// Extract a knowledge graph from text files into the configured store
    Ingest {
        /// Text files to ingest, chunked on blank lines
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Answer a question over an ingested corpus
    Query {
        /// The question to answer
        question: String,

        /// Text files forming the vector-search corpus
        #[arg(long = "corpus")]
        corpus: Vec<PathBuf>,

        /// Override the configured retrieval strategy
        #[arg(long, value_enum)]
        strategy: Option<StrategyArg>,

        /// Override the configured fusion policy
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Override the configured traversal depth (1 or 2)
        #[arg(long)]
        depth: Option<u8>,

        /// Override the configured top-k
        #[arg(long)]
        topk: Option<usize>,

        /// Print the retrieved context alongside the answer
        #[arg(long)]
        show_context: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StrategyArg {
    Vector,
    Graph,
    Hybrid,
}

impl From<StrategyArg> for RetrievalStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Vector => RetrievalStrategy::Vector,
            StrategyArg::Graph => RetrievalStrategy::Graph,
            StrategyArg::Hybrid => RetrievalStrategy::Hybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Union,
    Intersection,
}

impl From<PolicyArg> for FusionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Union => FusionPolicy::Union,
            PolicyArg::Intersection => FusionPolicy::Intersection,
        }
    }
}

pub fn parse_depth(value: u8) -> anyhow::Result<Depth> {
    Depth::try_from(value).map_err(|e| anyhow::anyhow!(e))
}
