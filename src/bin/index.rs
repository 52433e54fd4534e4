//! Indexing CLI: load PDFs, embed them, and upsert into the hosted index

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medirag::ingestion::IndexPipeline;
use medirag::providers::{
    EmbeddingProvider, HfInferenceEmbedder, PineconeIndex, VectorIndexProvider,
};
use medirag::RagConfig;

/// How long to wait for the index to become ready after creation
const READY_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Parser)]
#[command(name = "medirag-index", about = "Index PDF documents into the hosted vector index")]
struct Args {
    /// Directory of PDF files to index (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Delete and recreate the index before indexing
    #[arg(long)]
    recreate: bool,

    /// Embedding batch size (overrides config)
    #[arg(long)]
    batch_size: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medirag=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(data_dir) = args.data_dir {
        config.ingest.data_dir = data_dir;
    }
    if let Some(batch_size) = args.batch_size {
        config.embeddings.batch_size = batch_size;
    }

    let embedder: Arc<dyn EmbeddingProvider> =
        Arc::new(HfInferenceEmbedder::from_env(&config.embeddings)?);
    let index: Arc<dyn VectorIndexProvider> = Arc::new(PineconeIndex::from_env(&config.index)?);

    prepare_index(index.as_ref(), embedder.dimensions(), args.recreate).await?;

    let pipeline = IndexPipeline::new(&config, embedder, index.clone());
    let summary = pipeline.run(&config.ingest.data_dir).await?;

    tracing::info!(
        documents = summary.documents,
        chunks = summary.chunks,
        vectors = summary.vectors_upserted,
        elapsed_ms = summary.elapsed_ms,
        "Indexing complete"
    );
    for (filename, reason) in &summary.failures {
        tracing::warn!(filename, reason, "File was not indexed");
    }

    let total = index.vector_count().await?;
    tracing::info!(total_vectors = total, "Index statistics");
    Ok(())
}

/// Make sure the index exists and is ready, recreating it when asked
async fn prepare_index(
    index: &dyn VectorIndexProvider,
    dimensions: usize,
    recreate: bool,
) -> anyhow::Result<()> {
    let exists = index.index_exists().await?;

    if exists && recreate {
        tracing::info!("Deleting existing index");
        index.delete_index().await?;
        // Deletion is asynchronous on the hosted side; poll until gone
        let deadline = std::time::Instant::now() + READY_TIMEOUT;
        while index.index_exists().await? {
            if std::time::Instant::now() >= deadline {
                anyhow::bail!("Index was not deleted within {:?}", READY_TIMEOUT);
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    if !exists || recreate {
        tracing::info!(dimensions, "Creating index");
        index.create_index(dimensions).await?;
    }

    index.wait_until_ready(READY_TIMEOUT).await?;
    Ok(())
}
