use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tower_lsp::{LspService, Server};
use tracing_subscriber::EnvFilter;

use scribe_lsp::{Backend, Indexer, indexer::DEFAULT_EXTENSION};

/// Papyrus language server.
///
/// Without arguments the server speaks LSP over stdin/stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Index the given script directory, print a summary and exit.
    /// May be repeated.
    #[arg(long = "index", value_name = "DIR")]
    index: Vec<PathBuf>,

    /// Source file extension used with --index.
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Enable debug logging (overrides RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout belongs to the protocol; logs go to stderr.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    if !cli.index.is_empty() {
        return index_once(&cli.index, &cli.extension).await;
    }

    let (service, socket) = LspService::new(Backend::new);
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
    ExitCode::SUCCESS
}

/// One-shot scan for diagnosing a script tree from the command line.
async fn index_once(roots: &[PathBuf], extension: &str) -> ExitCode {
    let indexer = std::sync::Arc::new(Indexer::new(extension));
    let Some(stats) = scribe_lsp::run_scan(indexer.clone(), roots.to_vec()).await else {
        return ExitCode::FAILURE;
    };

    println!(
        "indexed {} files ({} scripts) in {}ms, {} errors",
        stats.files_indexed,
        indexer.index().script_count(),
        stats.elapsed.as_millis(),
        stats.errors
    );
    ExitCode::SUCCESS
}
