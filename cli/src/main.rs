use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use irsim_cli::client::{ClientError, SimulateClient};
use irsim_cli::corpus::{assemble_dir, load_corpus};
use irsim_core::config::{KMEANS_DEFAULT_SEED, KMEANS_MAX_ITERATIONS, KMEANS_RESTARTS};
use irsim_core::output::ErrorBody;
use irsim_core::tokenizer::StemmerKind;
use irsim_core::{Engine, EngineConfig, MethodId, SimulateRequest};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "irsim")]
#[command(about = "Run information retrieval methods over a text corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a method in-process
    Run {
        #[command(flatten)]
        input: RequestArgs,
        /// Stemmer applied after tokenization (none, english, german, ...)
        #[arg(long, default_value_t = StemmerKind::English)]
        stemmer: StemmerKind,
        /// Seed for k-means++ initialization
        #[arg(long, default_value_t = KMEANS_DEFAULT_SEED)]
        seed: u64,
        /// Maximum k-means iterations
        #[arg(long, default_value_t = KMEANS_MAX_ITERATIONS)]
        max_iterations: usize,
        /// Seeded k-means runs, best inertia kept
        #[arg(long, default_value_t = KMEANS_RESTARTS)]
        restarts: usize,
    },
    /// Send the request to a running irsim-server
    Remote {
        #[command(flatten)]
        input: RequestArgs,
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:5000")]
        url: String,
        /// Request timeout seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
    /// Print the corpus assembled from a directory of .txt/.md files
    Corpus {
        #[arg(long)]
        dir: PathBuf,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// regex, vsm, boolean, bm25, clustering or relevance
    #[arg(long)]
    method: MethodId,
    /// Query, pattern, boolean expression, or K for clustering
    #[arg(long)]
    query: String,
    /// Corpus file
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Directory of .txt/.md files, one document per file
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Inline corpus text
    #[arg(long)]
    text: Option<String>,
    /// Comma-separated docIds judged relevant (relevance feedback round)
    #[arg(long, value_delimiter = ',')]
    relevant: Option<Vec<usize>>,
}

impl RequestArgs {
    fn to_request(&self) -> Result<SimulateRequest> {
        let documents = load_corpus(self.corpus.as_deref(), self.dir.as_deref(), self.text.as_deref())?;
        Ok(SimulateRequest {
            method_id: self.method,
            query: self.query.clone(),
            documents,
            relevant_doc_ids: self.relevant.clone(),
        })
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input, stemmer, seed, max_iterations, restarts } => {
            let config = EngineConfig {
                stemmer,
                kmeans_seed: seed,
                kmeans_max_iterations: max_iterations,
                kmeans_restarts: restarts,
                ..EngineConfig::default()
            };
            let req = input.to_request()?;
            match Engine::new(config).run(&req) {
                Ok(out) => print_json(&out),
                Err(err) => {
                    print_json(&ErrorBody { error: err.to_string() })?;
                    bail!("{} failed: {err}", req.method_id)
                }
            }
        }
        Commands::Remote { input, url, timeout_secs } => {
            let client = SimulateClient::new(&url, Duration::from_secs(timeout_secs))?;
            let req = input.to_request()?;
            match client.simulate(&req).await {
                Ok(out) => print_json(&out),
                Err(err @ ClientError::ServiceUnavailable { .. }) => bail!(err),
                Err(err) => {
                    print_json(&ErrorBody { error: err.to_string() })?;
                    bail!("{} failed: {err}", req.method_id)
                }
            }
        }
        Commands::Corpus { dir } => {
            print!("{}", assemble_dir(&dir)?);
            Ok(())
        }
    }
}
