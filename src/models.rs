//! Core data types shared between the backend client and the workbench
//! controller.
//!
//! All wire types mirror the workbench server's JSON API field-for-field.
//! They are deserialized verbatim and never merged: a stats refresh or a
//! new query result always replaces the previous value wholesale.

use serde::{Deserialize, Serialize};

/// Server-reported index statistics.
///
/// Fetched at startup and after every successful mutation (index or clear).
/// A failed refresh leaves the previously cached value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Number of documents currently indexed.
    #[serde(default)]
    pub total_documents: u64,
    /// Number of chunks the backend derived from those documents.
    #[serde(default)]
    pub total_chunks: u64,
    /// Dimensionality of the backend's embedding vectors.
    #[serde(default)]
    pub vector_dimension: u64,
}

/// Acknowledgement returned by the index operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexReceipt {
    /// Number of documents indexed by this call.
    #[serde(default)]
    pub count: u64,
    /// Running total of documents in the index after this call.
    #[serde(default)]
    pub total: u64,
}

/// Outcome of a single query: an answer plus the passages it was
/// conditioned on.
///
/// `relevance_scores` is parallel to `documents` by index. The backend may
/// omit it entirely, or return fewer scores than passages; a missing score
/// renders as absent, never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// The generated answer text.
    #[serde(default)]
    pub answer: String,
    /// Source passages the answer was conditioned on, most relevant first.
    #[serde(default)]
    pub documents: Vec<String>,
    /// Per-passage relevance in `[0.0, 1.0]`, parallel to `documents`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance_scores: Option<Vec<f32>>,
}

impl QueryResult {
    /// Relevance score for the passage at `index`, if the backend
    /// reported one.
    pub fn score_for(&self, index: usize) -> Option<f32> {
        self.relevance_scores
            .as_ref()
            .and_then(|scores| scores.get(index))
            .copied()
    }
}

/// Response from the backend's `GET /health` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
}
