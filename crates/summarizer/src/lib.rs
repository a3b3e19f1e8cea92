//! Summarizers for the index-md indexer.
//!
//! - [`ExcerptSummarizer`]: offline and deterministic, built from the text itself
//! - [`LlmSummarizer`]: OpenAI-compatible chat completions endpoint
//!
//! Both implement [`ContentSummarizer`](index_md_indexer::ContentSummarizer) and
//! [`IndexSummarizer`](index_md_indexer::IndexSummarizer).

mod excerpt;
mod llm;

pub use excerpt::{ExcerptConfig, ExcerptSummarizer};
pub use llm::{LlmConfig, LlmSummarizer};

/// Heading that opens every file entry produced by this crate.
pub fn file_heading(file_name: &str) -> String {
    format!("### {file_name}")
}

/// Cut `text` to at most `max_chars` characters, marking the cut with an ellipsis.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}…", &text[..byte_idx]),
        None => text.to_string(),
    }
}
