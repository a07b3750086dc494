use anyhow::Result;
use axum::Router;
use clap::Parser;
use irsim_core::config::{KMEANS_DEFAULT_SEED, KMEANS_MAX_ITERATIONS, KMEANS_RESTARTS};
use irsim_core::tokenizer::StemmerKind;
use irsim_core::EngineConfig;
use irsim_server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "irsim-server", about = "HTTP endpoint for the retrieval methods engine")]
struct Args {
    /// Host to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Stemmer applied after tokenization (none, english, german, ...)
    #[arg(long, default_value_t = StemmerKind::English)]
    stemmer: StemmerKind,
    /// Seed for k-means++ initialization
    #[arg(long, default_value_t = KMEANS_DEFAULT_SEED)]
    kmeans_seed: u64,
    /// Maximum k-means iterations
    #[arg(long, default_value_t = KMEANS_MAX_ITERATIONS)]
    kmeans_max_iterations: usize,
    /// Seeded k-means runs per request, best inertia kept
    #[arg(long, default_value_t = KMEANS_RESTARTS)]
    kmeans_restarts: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = EngineConfig {
        stemmer: args.stemmer,
        kmeans_seed: args.kmeans_seed,
        kmeans_max_iterations: args.kmeans_max_iterations,
        kmeans_restarts: args.kmeans_restarts,
        ..EngineConfig::default()
    };
    let app: Router = build_app(config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, stemmer = %args.stemmer, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
