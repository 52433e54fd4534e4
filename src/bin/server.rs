//! Chat server entry point

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use medirag::server::state::AppState;
use medirag::server::RagServer;
use medirag::RagConfig;

#[derive(Parser)]
#[command(name = "medirag-server", about = "Medical document chat server")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medirag=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = RagConfig::load(args.config.as_deref())?;

    let state = AppState::new(config)?;
    probe_providers(&state).await;

    let server = RagServer::with_state(state);
    server.start().await?;
    Ok(())
}

/// Log a warning for any provider that fails its health check at startup.
/// The server still starts; requests will surface the errors.
async fn probe_providers(state: &AppState) {
    let retriever = state.retriever();

    match retriever.embedder().health_check().await {
        Ok(true) => tracing::info!(provider = retriever.embedder().name(), "Embedder healthy"),
        Ok(false) | Err(_) => {
            tracing::warn!(
                provider = retriever.embedder().name(),
                "Embedding provider failed health check"
            );
        }
    }

    match retriever.index().health_check().await {
        Ok(true) => tracing::info!(provider = retriever.index().name(), "Vector index healthy"),
        Ok(false) | Err(_) => {
            tracing::warn!(
                provider = retriever.index().name(),
                "Vector index failed health check"
            );
        }
    }

    match state.llm().health_check().await {
        Ok(true) => tracing::info!(provider = state.llm().name(), model = state.llm().model(), "LLM healthy"),
        Ok(false) | Err(_) => {
            tracing::warn!(provider = state.llm().name(), "LLM provider failed health check");
        }
    }
}
