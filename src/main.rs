//! chunkmill CLI binary.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use chunkmill::config::IngestConfig;
use chunkmill::embeddings::OllamaEmbedder;
use chunkmill::ingestion::IngestionCoordinator;
use chunkmill::stores::{PostgresSegmentStore, SegmentStore};
use chunkmill::types::IngestError;

/// Ingest text documents into a pgvector-backed knowledge base.
#[derive(Parser, Debug)]
#[command(name = "chunkmill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Segment, embed, and index text documents idempotently")]
struct Args {
    /// Files or directories to ingest (directories are walked recursively).
    #[arg(default_value = "docs")]
    paths: Vec<PathBuf>,

    /// Re-process segments that are already indexed.
    #[arg(long)]
    force: bool,

    /// Maximum number of files to process this run.
    #[arg(long)]
    limit: Option<usize>,

    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Embedding service base URL.
    #[arg(long, env = "EMBEDDING_URL")]
    embedding_url: Option<String>,

    /// Embedding model identifier.
    #[arg(long, env = "EMBEDDING_MODEL")]
    model: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), IngestError> {
    let mut config = IngestConfig::from_env()
        .with_force(args.force)
        .with_file_limit(args.limit);
    if let Some(url) = args.database_url {
        config = config.with_database_url(url);
    }
    if let Some(url) = args.embedding_url {
        config = config.with_embedding_url(url);
    }
    if let Some(model) = args.model {
        config = config.with_embedding_model(model);
    }

    let store = PostgresSegmentStore::connect(&config.database_url).await?;
    store.ensure_schema(config.embedding_dimension).await?;

    let embedder = OllamaEmbedder::from_config(&config);
    let coordinator = IngestionCoordinator::new(embedder, store, config)?;

    let summary = coordinator.run(&args.paths).await?;

    println!("Ingestion complete!");
    println!("  Files processed: {}", summary.files_processed());
    println!("  Segments stored: {}", summary.segments_stored());

    let counts = coordinator.store().count_by_source_type().await?;
    if !counts.is_empty() {
        println!("\nIndexed by source type:");
        for count in counts {
            println!("  {}: {}", count.source_type, count.indexed_count);
        }
    }

    Ok(())
}
