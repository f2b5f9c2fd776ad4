use anyhow::Result;
use axum::Router;
use clap::Parser;
use retrieval::seed::load_seed_corpus;
use retrieval::{Index, Script};
use server::{build_app, AppConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
    /// Load the built-in seed corpus at start-up
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    seed: bool,
    /// Target script for tokenization (cyrillic or latin)
    #[arg(long)]
    script: Option<Script>,
    /// Minimum similarity a document must exceed to be returned
    #[arg(long)]
    floor: Option<f32>,
    /// Default number of results per search
    #[arg(long)]
    top_k: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(script) = args.script {
        config.retrieval.script = script;
    }
    if let Some(floor) = args.floor {
        config.retrieval.relevance_floor = floor;
    }
    if let Some(top_k) = args.top_k {
        config.retrieval.top_k = top_k;
    }
    config.retrieval.validate()?;

    let index = Arc::new(Index::new(&config.retrieval));
    if args.seed {
        load_seed_corpus(&index);
    }
    let app: Router = build_app(index, &config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, script = %config.retrieval.script, floor = config.retrieval.relevance_floor, top_k = config.retrieval.top_k, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
