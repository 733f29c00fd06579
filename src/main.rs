//! # ragbench CLI
//!
//! The `ragbench` binary is the operator shell for a remote RAG
//! workbench. It indexes raw text documents, inspects index statistics,
//! runs retrieval-augmented queries, and clears the store.
//!
//! ## Usage
//!
//! ```bash
//! ragbench --config ./config/ragbench.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ragbench stats` | Show document, chunk, and vector-dimension counts |
//! | `ragbench index [FILE]` | Index blank-line-separated paragraphs from a file or stdin |
//! | `ragbench query "<text>"` | Answer a question from the indexed documents |
//! | `ragbench clear` | Remove every indexed document (asks for confirmation) |
//! | `ragbench health` | Check that the backend is reachable |
//!
//! ## Examples
//!
//! ```bash
//! # Index a notes file (each paragraph becomes one document)
//! ragbench index notes.txt
//!
//! # Pipe text in from another tool
//! pbpaste | ragbench index
//!
//! # Ask a question
//! ragbench query "how do we roll back a deployment?"
//!
//! # Wipe the index without the interactive prompt
//! ragbench clear --yes
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ragbench::commands;
use ragbench::config;

/// ragbench — a CLI workbench client for retrieval-augmented generation
/// backends.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with the backend address. When the file does not exist, built-in
/// defaults (a local backend on port 8080) are used.
#[derive(Parser)]
#[command(
    name = "ragbench",
    about = "A CLI workbench client for retrieval-augmented generation backends",
    version,
    long_about = "ragbench drives a remote RAG service: index raw text documents \
    (one per blank-line-separated paragraph), inspect index statistics, ask \
    natural-language questions answered from the most relevant passages, and \
    clear the store behind an explicit confirmation."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ragbench.toml`. Falls back to built-in
    /// defaults when the file does not exist.
    #[arg(long, global = true, default_value = "./config/ragbench.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Show index statistics.
    ///
    /// Prints the backend's document count, chunk count, and embedding
    /// vector dimensionality.
    Stats,

    /// Index documents from a file or stdin.
    ///
    /// The input is split on blank lines; each resulting paragraph is
    /// indexed as a separate document. On failure the input is not
    /// consumed and can be resubmitted as-is.
    Index {
        /// File to read. Reads stdin when omitted.
        file: Option<PathBuf>,
    },

    /// Query the indexed documents.
    ///
    /// Requests the three most relevant passages and prints the generated
    /// answer followed by its sources with relevance scores. Requires at
    /// least one indexed document.
    Query {
        /// The question to ask.
        text: String,
    },

    /// Remove every document from the index.
    ///
    /// Asks for confirmation first; declining changes nothing.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// Check backend connectivity.
    Health,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ragbench=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = if cli.config.exists() {
        config::load_config(&cli.config)?
    } else {
        config::Config::minimal()
    };

    match cli.command {
        Commands::Stats => {
            commands::run_stats(&cfg).await?;
        }
        Commands::Index { file } => {
            commands::run_index(&cfg, file.as_deref()).await?;
        }
        Commands::Query { text } => {
            commands::run_query(&cfg, &text).await?;
        }
        Commands::Clear { yes } => {
            commands::run_clear(&cfg, yes).await?;
        }
        Commands::Health => {
            commands::run_health(&cfg).await?;
        }
    }

    Ok(())
}
