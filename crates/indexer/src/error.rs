use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Path not found or unreadable: {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Summarization failed for {}: {source}", .path.display())]
    Summarization {
        path: PathBuf,
        #[source]
        source: SummarizeError,
    },

    #[error("Failed to write index document {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid directory path: {0}")]
    InvalidPath(String),

    #[error("Directory depth exceeds limit of {max_depth} at {}", .path.display())]
    DepthLimit { path: PathBuf, max_depth: usize },
}

impl IndexerError {
    pub(crate) fn not_found(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::NotFound {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn summarization(path: impl Into<PathBuf>, source: SummarizeError) -> Self {
        Self::Summarization {
            path: path.into(),
            source,
        }
    }
}

/// Failure reported by a [`ContentSummarizer`](crate::ContentSummarizer) or
/// [`IndexSummarizer`](crate::IndexSummarizer).
#[derive(Error, Debug)]
pub enum SummarizeError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Summarizer service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Summarizer returned an empty response")]
    EmptyResponse,

    #[error("Invalid summarizer response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Other(String),
}
