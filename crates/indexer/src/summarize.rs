//! Collaborator seams consumed by [`TreeIndexer`](crate::TreeIndexer).
//!
//! Both services are treated as stateless: the indexer may call them any number of times and
//! expects identical output for identical input when the backing service is deterministic.

use async_trait::async_trait;

use crate::error::SummarizeError;
use crate::scanner::SUPPORTED_EXTENSIONS;

/// Turns the raw text of one source file into a short descriptive entry.
#[async_trait]
pub trait ContentSummarizer: Send + Sync {
    /// Extensions (with the leading dot) this summarizer accepts.
    fn supported_extensions(&self) -> &[&str] {
        SUPPORTED_EXTENSIONS
    }

    /// Summarize `raw_text`, the full content of `file_name`.
    ///
    /// The returned text becomes the file's entry verbatim, so implementations are expected to
    /// mention the file name themselves.
    async fn summarize_file(
        &self,
        file_name: &str,
        raw_text: &str,
    ) -> std::result::Result<String, SummarizeError>;
}

/// Collapses a child directory's full index document into a single entry.
#[async_trait]
pub trait IndexSummarizer: Send + Sync {
    async fn summarize_index(
        &self,
        document_text: &str,
    ) -> std::result::Result<String, SummarizeError>;
}
