//! Plain-text rendering of controller state for the CLI shell.
//!
//! Pure string formatting only; no I/O. The one contract that matters:
//! a source passage shows a relevance percentage only when the backend
//! reported a score at that index — a missing score renders nothing,
//! never `0%`.

use crate::models::{IndexStats, QueryResult};

/// Format a relevance score as a percentage with one decimal place.
pub fn format_score(score: f32) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Render index statistics as an aligned summary block.
pub fn render_stats(stats: &IndexStats) -> String {
    let mut out = String::new();
    out.push_str(&format!("  Documents:   {}\n", stats.total_documents));
    out.push_str(&format!("  Chunks:      {}\n", stats.total_chunks));
    out.push_str(&format!("  Vector dims: {}\n", stats.vector_dimension));
    out
}

/// Render a query result: the answer followed by its numbered sources.
pub fn render_result(result: &QueryResult) -> String {
    let mut out = String::new();

    out.push_str("Answer:\n");
    for line in result.answer.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }

    if !result.documents.is_empty() {
        out.push('\n');
        out.push_str("Sources:\n");
        for (index, source) in result.documents.iter().enumerate() {
            match result.score_for(index) {
                Some(score) => out.push_str(&format!(
                    "  [{}] (relevance {}) {}\n",
                    index + 1,
                    format_score(score),
                    source
                )),
                None => out.push_str(&format!("  [{}] {}\n", index + 1, source)),
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_formats_as_percentage() {
        assert_eq!(format_score(0.91), "91.0%");
        assert_eq!(format_score(0.425), "42.5%");
        assert_eq!(format_score(1.0), "100.0%");
    }

    #[test]
    fn missing_scores_render_as_absent_not_zero() {
        let result = QueryResult {
            answer: "a".to_string(),
            documents: vec!["s1".into(), "s2".into(), "s3".into()],
            relevance_scores: Some(vec![0.91, 0.42]),
        };
        let rendered = render_result(&result);

        assert!(rendered.contains("[1] (relevance 91.0%) s1"));
        assert!(rendered.contains("[2] (relevance 42.0%) s2"));
        assert!(rendered.contains("[3] s3"));
        assert!(!rendered.contains("[3] (relevance"));
        assert!(!rendered.contains("0.0%"));
    }

    #[test]
    fn sources_print_in_order() {
        let result = QueryResult {
            answer: "multi\nline".to_string(),
            documents: vec!["first".into(), "second".into()],
            relevance_scores: None,
        };
        let rendered = render_result(&result);

        let first = rendered.find("[1] first").unwrap();
        let second = rendered.find("[2] second").unwrap();
        assert!(first < second);
        assert!(rendered.contains("  multi\n  line\n"));
    }

    #[test]
    fn stats_block_lists_all_three_counts() {
        let stats = IndexStats {
            total_documents: 3,
            total_chunks: 12,
            vector_dimension: 1536,
        };
        let rendered = render_stats(&stats);
        assert!(rendered.contains("Documents:   3"));
        assert!(rendered.contains("Chunks:      12"));
        assert!(rendered.contains("Vector dims: 1536"));
    }
}
