use anyhow::Result;
use clap::{Parser, Subcommand};
use indexer::load_path;
use retrieval::generate::MockGenerator;
use retrieval::pipeline::RagPipeline;
use retrieval::seed::load_seed_corpus;
use retrieval::{Index, RetrievalConfig, Script};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Load documents into an in-memory index and query it", long_about = None)]
struct Cli {
    /// Input path (file or directory of .json/.jsonl/.txt documents)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Load the built-in seed corpus before any input files
    #[arg(long, default_value_t = false)]
    seed: bool,
    /// Target script for tokenization (cyrillic or latin)
    #[arg(long)]
    script: Option<Script>,
    /// Minimum similarity a document must exceed to be returned
    #[arg(long)]
    floor: Option<f32>,
    /// Default number of results
    #[arg(long)]
    top_k: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank stored documents against a query
    Query {
        q: String,
        #[arg(long)]
        k: Option<usize>,
    },
    /// Print the context block that would be handed to the generator
    Context { q: String },
    /// Answer a question from retrieved context using the offline generator
    Ask { q: String },
    /// Print document and vocabulary counts
    Stats,
    /// List stored documents with their ids
    List,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let mut config = RetrievalConfig::from_env()?;
    if let Some(script) = cli.script {
        config.script = script;
    }
    if let Some(floor) = cli.floor {
        config.relevance_floor = floor;
    }
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    config.validate()?;

    let index = Arc::new(Index::new(&config));
    if cli.seed {
        load_seed_corpus(&index);
    }
    if let Some(input) = &cli.input {
        load_path(&index, input)?;
    }
    tracing::info!(stats = %index.stats(), script = %config.script, "index ready");

    match cli.command {
        Commands::Query { q, k } => {
            for hit in index.search_scored(&q, k.unwrap_or(config.top_k)) {
                println!("{}\t{:.4}\t{}", hit.document.id, hit.score, hit.document.content);
            }
        }
        Commands::Context { q } => {
            let pipeline = RagPipeline::new(Arc::clone(&index), config.top_k);
            println!("{}", pipeline.process_query(&q).context);
        }
        Commands::Ask { q } => {
            let pipeline = RagPipeline::new(Arc::clone(&index), config.top_k);
            let answer = pipeline.answer(&q, &MockGenerator::new())?;
            for doc in &answer.documents {
                tracing::info!(doc_id = %doc.id, "grounding document");
            }
            println!("{}", answer.answer);
        }
        Commands::Stats => {
            println!("{}", serde_json::to_string_pretty(&index.stats())?);
        }
        Commands::List => {
            for doc in index.documents() {
                println!("{}\t{}", doc.id, doc.content);
            }
        }
    }
    Ok(())
}
