//! The indexing & query workflow controller.
//!
//! [`Workbench`] is the single state object mediating between operator
//! input and the four remote operations of a [`RagBackend`]. It owns the
//! active mode, the busy gate, the draft batch, the stats cache, the last
//! status line, and the current query result. All mutation goes through
//! the operations below; guard state (what is currently allowed) is
//! derived on read, never stored.
//!
//! # Sequencing
//!
//! At most one mutating operation (index or query) is in flight at a
//! time; `busy` is the sole mutual-exclusion mechanism and is always
//! released when the operation settles. Stats refresh is exempt from the
//! gate: it is idempotent, best-effort, and last-write-wins. There is no
//! cancellation; the gate prevents issuing a new call until the prior one
//! settles.
//!
//! # Error surfacing
//!
//! Index and clear failures become human-readable status lines. Query
//! failures are logged but never surfaced as a status line, matching the
//! workbench UI this controller drives. Stats refresh failures are
//! swallowed entirely; the previous cached value stays authoritative.

use tracing::{debug, warn};

use crate::backend::RagBackend;
use crate::batch::split_documents;
use crate::models::{IndexStats, QueryResult};

/// Number of passages requested per query.
pub const TOP_K: usize = 3;

/// Which input surface the operator is working in. Switching is free and
/// always allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Index,
    Query,
}

/// Pending confirmation for a destructive clear.
///
/// Obtained from [`Workbench::request_clear`] and resolved by exactly one
/// of [`Workbench::confirm_clear`] or [`Workbench::cancel_clear`]. A token
/// superseded by a newer request is stale and confirming it is a no-op.
#[derive(Debug)]
pub struct ClearToken {
    generation: u64,
}

/// The workflow controller. One instance per workbench session; no
/// module-level mutable state.
pub struct Workbench<B: RagBackend> {
    backend: B,
    mode: Mode,
    busy: bool,
    draft: String,
    status: Option<String>,
    stats: Option<IndexStats>,
    result: Option<QueryResult>,
    clear_generation: u64,
}

impl<B: RagBackend> Workbench<B> {
    /// Create a controller around a backend. Stats start absent; call
    /// [`refresh_stats`](Self::refresh_stats) once after construction.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mode: Mode::default(),
            busy: false,
            draft: String::new(),
            status: None,
            stats: None,
            result: None,
            clear_generation: 0,
        }
    }

    // ── State accessors ────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Current draft batch text, exactly as the operator entered it.
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Last status line (index/clear outcome), if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Last successfully fetched stats, if any.
    pub fn stats(&self) -> Option<&IndexStats> {
        self.stats.as_ref()
    }

    /// Result of the most recent successful query, if any.
    pub fn result(&self) -> Option<&QueryResult> {
        self.result.as_ref()
    }

    // ── Derived guards (pure, evaluated on read) ───────────────────────

    pub fn can_submit_index(&self) -> bool {
        !self.busy && !self.draft.trim().is_empty()
    }

    pub fn can_submit_query(&self, text: &str) -> bool {
        !self.busy && !text.trim().is_empty() && self.indexed_documents() > 0
    }

    /// Whether the destructive clear action is offered at all.
    pub fn can_clear(&self) -> bool {
        self.indexed_documents() > 0
    }

    fn indexed_documents(&self) -> u64 {
        self.stats.as_ref().map_or(0, |s| s.total_documents)
    }

    // ── Input edges ────────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    // ── Operations ─────────────────────────────────────────────────────

    /// Best-effort stats refresh. Never touches the busy gate; a failure
    /// leaves the previous cached value in place.
    pub async fn refresh_stats(&mut self) {
        match self.backend.stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => debug!(error = %format!("{err:#}"), "stats refresh failed"),
        }
    }

    /// Batch the draft and submit it for indexing.
    ///
    /// No-op unless the draft trims non-empty and nothing is in flight.
    /// On success the draft is cleared and stats are refreshed; on failure
    /// the draft is preserved verbatim and the error lands in the status
    /// line. The busy gate is released either way.
    pub async fn submit_index(&mut self) {
        if !self.can_submit_index() {
            return;
        }

        self.busy = true;
        self.status = None;

        // The precondition on the raw draft is the only emptiness guard;
        // the batched sequence is submitted as-is.
        let documents = split_documents(&self.draft);

        match self.backend.index_documents(&documents).await {
            Ok(receipt) => {
                self.draft.clear();
                self.status = Some(format!(
                    "Indexed {} document{} ({} total)",
                    receipt.count,
                    if receipt.count == 1 { "" } else { "s" },
                    receipt.total
                ));
                self.refresh_stats().await;
            }
            Err(err) => {
                self.status = Some(format!("Indexing failed: {err:#}"));
            }
        }

        self.busy = false;
    }

    /// Submit a query for the top-[`TOP_K`] most relevant passages.
    ///
    /// No-op unless the text trims non-empty, nothing is in flight, and at
    /// least one document is indexed. The previous result is cleared
    /// before the call starts so a stale result never shows alongside a
    /// new in-flight query. Failures leave the result absent and are
    /// logged, not surfaced.
    pub async fn submit_query(&mut self, text: &str) {
        if !self.can_submit_query(text) {
            return;
        }

        self.busy = true;
        self.result = None;

        match self.backend.query(text.trim(), TOP_K).await {
            Ok(result) => self.result = Some(result),
            Err(err) => warn!(error = %format!("{err:#}"), "query failed"),
        }

        self.busy = false;
    }

    /// Begin the two-step clear protocol.
    ///
    /// Returns a confirmation token only while the clear action is
    /// offered (at least one indexed document). Issuing a new request
    /// invalidates any earlier outstanding token.
    pub fn request_clear(&mut self) -> Option<ClearToken> {
        if !self.can_clear() {
            return None;
        }
        self.clear_generation += 1;
        Some(ClearToken {
            generation: self.clear_generation,
        })
    }

    /// Decline a pending clear. No state changes.
    pub fn cancel_clear(&mut self, token: ClearToken) {
        if token.generation == self.clear_generation {
            // Invalidate the pending request so a later confirm of a
            // re-issued token starts fresh.
            self.clear_generation += 1;
        }
    }

    /// Confirm a pending clear and issue the call.
    ///
    /// Stale tokens are rejected as no-ops. On success the status line
    /// confirms the clear and stats are refreshed; on failure the error
    /// lands in the status line.
    pub async fn confirm_clear(&mut self, token: ClearToken) {
        if token.generation != self.clear_generation {
            return;
        }
        self.clear_generation += 1;

        match self.backend.clear().await {
            Ok(()) => {
                self.status = Some("Cleared all indexed documents".to_string());
                self.refresh_stats().await;
            }
            Err(err) => {
                self.status = Some(format!("Clear failed: {err:#}"));
            }
        }
    }

    #[cfg(test)]
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IndexReceipt;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct MockInner {
        index_calls: AtomicUsize,
        query_calls: AtomicUsize,
        stats_calls: AtomicUsize,
        clear_calls: AtomicUsize,
        fail_index: AtomicBool,
        fail_query: AtomicBool,
        fail_stats: AtomicBool,
        stats: Mutex<IndexStats>,
        next_result: Mutex<QueryResult>,
        last_batch: Mutex<Vec<String>>,
    }

    #[derive(Clone, Default)]
    struct MockBackend {
        inner: Arc<MockInner>,
    }

    impl MockBackend {
        fn with_documents(total: u64) -> Self {
            let mock = Self::default();
            mock.inner.stats.lock().unwrap().total_documents = total;
            mock
        }

        fn index_calls(&self) -> usize {
            self.inner.index_calls.load(Ordering::SeqCst)
        }
        fn query_calls(&self) -> usize {
            self.inner.query_calls.load(Ordering::SeqCst)
        }
        fn stats_calls(&self) -> usize {
            self.inner.stats_calls.load(Ordering::SeqCst)
        }
        fn clear_calls(&self) -> usize {
            self.inner.clear_calls.load(Ordering::SeqCst)
        }
        fn fail_index(&self, fail: bool) {
            self.inner.fail_index.store(fail, Ordering::SeqCst);
        }
        fn fail_query(&self, fail: bool) {
            self.inner.fail_query.store(fail, Ordering::SeqCst);
        }
        fn fail_stats(&self, fail: bool) {
            self.inner.fail_stats.store(fail, Ordering::SeqCst);
        }
        fn set_next_result(&self, result: QueryResult) {
            *self.inner.next_result.lock().unwrap() = result;
        }
        fn last_batch(&self) -> Vec<String> {
            self.inner.last_batch.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RagBackend for MockBackend {
        async fn index_documents(&self, documents: &[String]) -> Result<IndexReceipt> {
            self.inner.index_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.fail_index.load(Ordering::SeqCst) {
                bail!("index exploded");
            }
            *self.inner.last_batch.lock().unwrap() = documents.to_vec();
            let mut stats = self.inner.stats.lock().unwrap();
            stats.total_documents += documents.len() as u64;
            Ok(IndexReceipt {
                count: documents.len() as u64,
                total: stats.total_documents,
            })
        }

        async fn query(&self, _text: &str, _top_k: usize) -> Result<QueryResult> {
            self.inner.query_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.fail_query.load(Ordering::SeqCst) {
                bail!("query exploded");
            }
            Ok(self.inner.next_result.lock().unwrap().clone())
        }

        async fn stats(&self) -> Result<IndexStats> {
            self.inner.stats_calls.fetch_add(1, Ordering::SeqCst);
            if self.inner.fail_stats.load(Ordering::SeqCst) {
                bail!("stats exploded");
            }
            Ok(self.inner.stats.lock().unwrap().clone())
        }

        async fn clear(&self) -> Result<()> {
            self.inner.clear_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.stats.lock().unwrap().total_documents = 0;
            Ok(())
        }
    }

    fn answer(text: &str) -> QueryResult {
        QueryResult {
            answer: text.to_string(),
            documents: vec!["passage".to_string()],
            relevance_scores: Some(vec![0.5]),
        }
    }

    #[tokio::test]
    async fn successful_index_clears_draft_and_refreshes_stats_once() {
        let mock = MockBackend::default();
        let mut wb = Workbench::new(mock.clone());

        wb.set_draft("doc one\n\ndoc two");
        wb.submit_index().await;

        assert_eq!(wb.draft(), "");
        assert_eq!(mock.index_calls(), 1);
        assert_eq!(mock.stats_calls(), 1);
        assert_eq!(mock.last_batch(), vec!["doc one", "doc two"]);
        assert_eq!(wb.status(), Some("Indexed 2 documents (2 total)"));
        assert_eq!(wb.stats().unwrap().total_documents, 2);
        assert!(!wb.is_busy());
    }

    #[tokio::test]
    async fn failed_index_preserves_draft_verbatim() {
        let mock = MockBackend::default();
        mock.fail_index(true);
        let mut wb = Workbench::new(mock.clone());

        wb.set_draft("  keep me exactly  ");
        wb.submit_index().await;

        assert_eq!(wb.draft(), "  keep me exactly  ");
        assert_eq!(mock.stats_calls(), 0);
        let status = wb.status().unwrap();
        assert!(status.starts_with("Indexing failed:"), "got: {status}");
        assert!(status.contains("index exploded"));
        assert!(!wb.is_busy());
    }

    #[tokio::test]
    async fn submit_index_while_busy_is_a_no_op() {
        let mock = MockBackend::default();
        let mut wb = Workbench::new(mock.clone());

        wb.set_draft("something");
        wb.set_busy(true);
        wb.submit_index().await;

        assert_eq!(wb.draft(), "something");
        assert_eq!(mock.index_calls(), 0);
        assert_eq!(mock.stats_calls(), 0);
        assert!(wb.status().is_none());
    }

    #[tokio::test]
    async fn submit_index_with_blank_draft_is_a_no_op() {
        let mock = MockBackend::default();
        let mut wb = Workbench::new(mock.clone());

        wb.set_draft("   \n\n  ");
        wb.submit_index().await;

        assert_eq!(mock.index_calls(), 0);
        assert!(wb.status().is_none());
    }

    #[tokio::test]
    async fn query_is_a_no_op_when_nothing_is_indexed() {
        let mock = MockBackend::default();
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        wb.submit_query("anything at all").await;

        assert_eq!(mock.query_calls(), 0);
        assert!(wb.result().is_none());
    }

    #[tokio::test]
    async fn query_is_a_no_op_before_stats_ever_load() {
        let mock = MockBackend::with_documents(5);
        let mut wb = Workbench::new(mock.clone());

        // Stats never fetched: the cache is absent, so the guard holds.
        wb.submit_query("anything").await;

        assert_eq!(mock.query_calls(), 0);
    }

    #[tokio::test]
    async fn successful_query_stores_result_verbatim() {
        let mock = MockBackend::with_documents(3);
        mock.set_next_result(answer("result b"));
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        wb.submit_query("  question  ").await;

        assert_eq!(wb.result().unwrap().answer, "result b");
        assert!(!wb.is_busy());
        // Query outcomes never touch the status line.
        assert!(wb.status().is_none());
    }

    #[tokio::test]
    async fn stale_result_is_cleared_before_the_call_starts() {
        let mock = MockBackend::with_documents(3);
        mock.set_next_result(answer("result a"));
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        wb.submit_query("first").await;
        assert_eq!(wb.result().unwrap().answer, "result a");

        // A failing follow-up proves the old result was dropped before
        // the call, not merely replaced after it.
        mock.fail_query(true);
        wb.submit_query("second").await;

        assert_eq!(mock.query_calls(), 2);
        assert!(wb.result().is_none());
        assert!(wb.status().is_none());
        assert!(!wb.is_busy());
    }

    #[tokio::test]
    async fn query_failure_is_not_surfaced_as_status() {
        let mock = MockBackend::with_documents(1);
        mock.fail_query(true);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        wb.submit_query("question").await;

        assert_eq!(mock.query_calls(), 1);
        assert!(wb.result().is_none());
        assert!(wb.status().is_none());
    }

    #[tokio::test]
    async fn stats_refresh_failure_keeps_previous_value() {
        let mock = MockBackend::with_documents(7);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;
        assert_eq!(wb.stats().unwrap().total_documents, 7);

        mock.fail_stats(true);
        wb.refresh_stats().await;

        assert_eq!(wb.stats().unwrap().total_documents, 7);
    }

    #[tokio::test]
    async fn clear_requires_indexed_documents() {
        let mock = MockBackend::default();
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        assert!(wb.request_clear().is_none());
        assert_eq!(mock.clear_calls(), 0);
    }

    #[tokio::test]
    async fn cancelled_clear_changes_nothing() {
        let mock = MockBackend::with_documents(4);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        let token = wb.request_clear().unwrap();
        wb.cancel_clear(token);

        assert_eq!(mock.clear_calls(), 0);
        assert!(wb.status().is_none());
        assert_eq!(wb.stats().unwrap().total_documents, 4);
    }

    #[tokio::test]
    async fn confirmed_clear_sets_status_and_refreshes_stats() {
        let mock = MockBackend::with_documents(4);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;
        let stats_before = mock.stats_calls();

        let token = wb.request_clear().unwrap();
        wb.confirm_clear(token).await;

        assert_eq!(mock.clear_calls(), 1);
        assert_eq!(mock.stats_calls(), stats_before + 1);
        assert_eq!(wb.status(), Some("Cleared all indexed documents"));
        assert_eq!(wb.stats().unwrap().total_documents, 0);
    }

    #[tokio::test]
    async fn stale_clear_token_is_rejected() {
        let mock = MockBackend::with_documents(4);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        let stale = wb.request_clear().unwrap();
        let fresh = wb.request_clear().unwrap();

        wb.confirm_clear(stale).await;
        assert_eq!(mock.clear_calls(), 0);

        wb.confirm_clear(fresh).await;
        assert_eq!(mock.clear_calls(), 1);
    }

    #[tokio::test]
    async fn clear_token_cannot_be_reused_after_cancel() {
        let mock = MockBackend::with_documents(4);
        let mut wb = Workbench::new(mock.clone());
        wb.refresh_stats().await;

        let token = wb.request_clear().unwrap();
        wb.cancel_clear(token);

        // A fresh request after cancelling still works.
        let token = wb.request_clear().unwrap();
        wb.confirm_clear(token).await;
        assert_eq!(mock.clear_calls(), 1);
    }

    #[tokio::test]
    async fn guards_derive_from_primitive_state() {
        let mock = MockBackend::with_documents(1);
        let mut wb = Workbench::new(mock.clone());

        assert!(!wb.can_submit_index());
        wb.set_draft("text");
        assert!(wb.can_submit_index());

        assert!(!wb.can_submit_query("q"));
        wb.refresh_stats().await;
        assert!(wb.can_submit_query("q"));
        assert!(!wb.can_submit_query("   "));
        assert!(wb.can_clear());

        wb.set_busy(true);
        assert!(!wb.can_submit_index());
        assert!(!wb.can_submit_query("q"));
        // The clear action is gated by stats alone.
        assert!(wb.can_clear());
    }

    #[tokio::test]
    async fn mode_switching_is_always_allowed() {
        let mut wb = Workbench::new(MockBackend::default());
        assert_eq!(wb.mode(), Mode::Index);

        wb.set_busy(true);
        wb.set_mode(Mode::Query);
        assert_eq!(wb.mode(), Mode::Query);
        wb.set_mode(Mode::Index);
        assert_eq!(wb.mode(), Mode::Index);
    }
}
