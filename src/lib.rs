//! # ragbench
//!
//! A CLI workbench client for retrieval-augmented generation backends.
//!
//! ragbench drives a remote RAG service: paste in raw text and each
//! blank-line-separated paragraph is indexed as a document, then ask
//! natural-language questions that are answered from the most relevant
//! indexed passages with per-passage relevance scores. The backend owns
//! the vector index, embeddings, and chunking; this crate owns the
//! workflow around them.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌─────────────┐   ┌──────────┐
//! │   CLI    │──▶│  Workbench   │──▶│ RagBackend  │──▶│  Remote   │
//! │ (shell)  │   │ (controller) │   │   (trait)   │   │ HTTP API  │
//! └──────────┘   └─────────────┘   └─────────────┘   └──────────┘
//! ```
//!
//! The [`workbench::Workbench`] controller is the only stateful piece: it
//! sequences the four remote operations (index, query, stats, clear),
//! gates them behind a busy flag, and keeps the last status line, stats
//! cache, and query result. The CLI is a passive shell that prints that
//! state; the backend is an injected capability so tests run against an
//! in-memory mock.
//!
//! ## Quick Start
//!
//! ```bash
//! ragbench stats                      # check the index
//! ragbench index notes.txt            # index paragraphs from a file
//! echo "some text" | ragbench index   # or from stdin
//! ragbench query "what do my notes say about deployment?"
//! ragbench clear --yes                # wipe the index
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Wire/data types |
//! | [`batch`] | Blank-line document batching |
//! | [`backend`] | Backend capability trait + HTTP client |
//! | [`workbench`] | Workflow controller state machine |
//! | [`render`] | Plain-text rendering of results and stats |
//! | [`commands`] | CLI command handlers |

pub mod backend;
pub mod batch;
pub mod commands;
pub mod config;
pub mod models;
pub mod render;
pub mod workbench;
