//! CLI command handlers.
//!
//! Each `run_*` function is a thin shell around a [`Workbench`] instance:
//! it constructs the HTTP backend, refreshes stats, drives one controller
//! operation, and prints the resulting state. All decisions about what is
//! allowed live in the controller's guards, not here.

use anyhow::{Context, Result};
use std::io::{BufRead, Read, Write};
use std::path::Path;

use crate::backend::HttpBackend;
use crate::config::Config;
use crate::render;
use crate::workbench::{Mode, Workbench};

fn connect(config: &Config) -> Result<Workbench<HttpBackend>> {
    let backend = HttpBackend::new(&config.backend)?;
    Ok(Workbench::new(backend))
}

/// `ragbench stats` — refresh and print index statistics.
pub async fn run_stats(config: &Config) -> Result<()> {
    let mut wb = connect(config)?;
    wb.refresh_stats().await;

    match wb.stats() {
        Some(stats) => {
            println!("Index stats");
            println!("===========");
            print!("{}", render::render_stats(stats));
        }
        None => println!("Stats unavailable — is the backend running?"),
    }

    Ok(())
}

/// `ragbench index [FILE]` — read raw text (file or stdin), split it into
/// documents on blank lines, and submit the batch.
pub async fn run_index(config: &Config, file: Option<&Path>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut wb = connect(config)?;
    wb.refresh_stats().await;
    wb.set_mode(Mode::Index);
    wb.set_draft(raw);

    if !wb.can_submit_index() {
        println!("Nothing to index — input is empty.");
        return Ok(());
    }

    wb.submit_index().await;

    if let Some(status) = wb.status() {
        println!("{status}");
    }
    if let Some(stats) = wb.stats() {
        println!();
        print!("{}", render::render_stats(stats));
    }

    Ok(())
}

/// `ragbench query <TEXT>` — answer a question from the indexed documents.
pub async fn run_query(config: &Config, text: &str) -> Result<()> {
    let mut wb = connect(config)?;
    wb.refresh_stats().await;
    wb.set_mode(Mode::Query);

    if !wb.can_submit_query(text) {
        if text.trim().is_empty() {
            println!("Query text is empty.");
        } else {
            println!("No documents indexed yet. Run `ragbench index` first.");
        }
        return Ok(());
    }

    wb.submit_query(text).await;

    match wb.result() {
        Some(result) => print!("{}", render::render_result(result)),
        // Failures are logged by the controller, not surfaced here.
        None => println!("No answer."),
    }

    Ok(())
}

/// `ragbench clear [--yes]` — remove every document, behind confirmation.
pub async fn run_clear(config: &Config, assume_yes: bool) -> Result<()> {
    let mut wb = connect(config)?;
    wb.refresh_stats().await;

    let Some(token) = wb.request_clear() else {
        println!("Nothing to clear — the index is empty.");
        return Ok(());
    };

    let confirmed = assume_yes || prompt_confirm("Clear all indexed documents? [y/N] ")?;
    if !confirmed {
        wb.cancel_clear(token);
        println!("Aborted.");
        return Ok(());
    }

    wb.confirm_clear(token).await;

    if let Some(status) = wb.status() {
        println!("{status}");
    }

    Ok(())
}

/// `ragbench health` — ping the backend's health endpoint.
pub async fn run_health(config: &Config) -> Result<()> {
    let backend = HttpBackend::new(&config.backend)?;
    let health = backend.health().await?;

    match health.time {
        Some(time) => println!("Backend is {} (server time {})", health.status, time),
        None => println!("Backend is {}", health.status),
    }

    Ok(())
}

fn prompt_confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;

    let reply = line.trim().to_ascii_lowercase();
    Ok(reply == "y" || reply == "yes")
}
