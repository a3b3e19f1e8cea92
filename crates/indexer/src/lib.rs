//! # index-md indexer
//!
//! Writes a human-readable index document into every directory of a tree.
//!
//! ## Fold
//!
//! ```text
//! root/
//!     │
//!     ├──> file.rs          ──> ContentSummarizer ──> file entry
//!     │
//!     ├──> sub/             ──> "## folder : sub"
//!     │      ├──> ... (recurse, write sub/.Index.md)
//!     │      └──> IndexSummarizer(sub/.Index.md) ──> folder summary entry
//!     │
//!     └──> root/.Index.md   (entries joined by a blank line)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use index_md_indexer::{ContentSummarizer, IndexSummarizer, SummarizeError, TreeIndexer};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl ContentSummarizer for Echo {
//!     async fn summarize_file(&self, name: &str, _text: &str) -> Result<String, SummarizeError> {
//!         Ok(format!("### {name}"))
//!     }
//! }
//!
//! #[async_trait::async_trait]
//! impl IndexSummarizer for Echo {
//!     async fn summarize_index(&self, text: &str) -> Result<String, SummarizeError> {
//!         Ok(text.lines().next().unwrap_or_default().to_string())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let echo = Arc::new(Echo);
//!     let indexer = TreeIndexer::new(echo.clone(), echo);
//!     let stats = indexer.index_directory("/path/to/project").await?;
//!
//!     println!("Wrote {} index documents", stats.directories);
//!     Ok(())
//! }
//! ```

mod document;
mod error;
mod fs;
mod indexer;
mod scanner;
mod stats;
mod summarize;

pub use document::{
    folder_headers, IndexDocument, IndexEntry, DEFAULT_INDEX_FILE_NAME, ENTRY_SEPARATOR,
};
pub use error::{IndexerError, Result, SummarizeError};
pub use fs::{ChildEntry, ChildKind, IndexFs, LocalFs};
pub use indexer::{IndexerOptions, TreeIndexer, DEFAULT_MAX_DEPTH};
pub use scanner::{file_extension, is_source_file, EntryOrder, SUPPORTED_EXTENSIONS};
pub use stats::IndexStats;
pub use summarize::{ContentSummarizer, IndexSummarizer};
