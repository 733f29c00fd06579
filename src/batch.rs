//! Document batching: turning raw pasted text into indexable documents.
//!
//! The workbench accepts one big blob of text and treats each paragraph as
//! a separate document. Paragraphs are separated by blank lines; runs of
//! consecutive blank lines collapse into a single boundary.

/// Split raw text into an ordered list of non-empty documents.
///
/// Rules:
/// - A blank-line boundary (two or more consecutive line breaks, or lines
///   containing only whitespace) separates documents.
/// - Each document is trimmed of leading/trailing whitespace.
/// - Segments that are empty after trimming are dropped.
/// - Input order is preserved.
///
/// Blank or whitespace-only input yields an empty vector. CRLF line
/// endings behave identically to LF.
pub fn split_documents(raw: &str) -> Vec<String> {
    let mut documents = Vec::new();
    let mut current = String::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            push_document(&mut documents, &mut current);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    push_document(&mut documents, &mut current);

    documents
}

fn push_document(documents: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        documents.push(trimmed.to_string());
    }
    current.clear();
}
