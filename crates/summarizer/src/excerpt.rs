use async_trait::async_trait;
use index_md_indexer::{
    folder_headers, ContentSummarizer, IndexSummarizer, SummarizeError, ENTRY_SEPARATOR,
};
use serde::{Deserialize, Serialize};

use crate::{file_heading, truncate_chars};

const MAX_LISTED_NAMES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcerptConfig {
    /// Non-blank lines kept from each file
    pub max_lines: usize,
    /// Cap on the excerpt body, in characters
    pub max_chars: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            max_lines: 5,
            max_chars: 400,
        }
    }
}

/// Summarizes without any external service: file entries quote the head of the file, folder
/// entries list what the child document contains.
#[derive(Debug, Clone, Default)]
pub struct ExcerptSummarizer {
    config: ExcerptConfig,
}

impl ExcerptSummarizer {
    pub fn new(config: ExcerptConfig) -> Self {
        Self { config }
    }

    fn excerpt(&self, raw_text: &str) -> String {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .take(self.config.max_lines)
            .collect();
        truncate_chars(&lines.join("\n"), self.config.max_chars)
    }
}

#[async_trait]
impl ContentSummarizer for ExcerptSummarizer {
    async fn summarize_file(
        &self,
        file_name: &str,
        raw_text: &str,
    ) -> Result<String, SummarizeError> {
        let excerpt = self.excerpt(raw_text);
        let body = if excerpt.is_empty() {
            "(empty file)".to_string()
        } else {
            excerpt
        };
        Ok(format!("{}\n{body}", file_heading(file_name)))
    }
}

#[async_trait]
impl IndexSummarizer for ExcerptSummarizer {
    async fn summarize_index(&self, document_text: &str) -> Result<String, SummarizeError> {
        if document_text.trim().is_empty() {
            return Ok("(empty folder)".to_string());
        }

        let files: Vec<&str> = document_text
            .split(ENTRY_SEPARATOR)
            .filter_map(|block| block.strip_prefix("### "))
            .filter_map(|block| block.lines().next())
            .collect();
        let folders = folder_headers(document_text);

        let mut parts = Vec::new();
        if !files.is_empty() {
            parts.push(describe(files.len(), "file", &files));
        }
        if !folders.is_empty() {
            parts.push(describe(folders.len(), "folder", &folders));
        }

        let summary = if parts.is_empty() {
            document_text
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or_default()
                .trim()
                .to_string()
        } else {
            format!("Contains {}.", parts.join(" and "))
        };
        Ok(truncate_chars(&summary, self.config.max_chars))
    }
}

fn describe(count: usize, noun: &str, names: &[&str]) -> String {
    let plural = if count == 1 { "" } else { "s" };
    let mut listed = names
        .iter()
        .take(MAX_LISTED_NAMES)
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > MAX_LISTED_NAMES {
        listed.push_str(", …");
    }
    format!("{count} {noun}{plural} ({listed})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn file_entry_quotes_leading_non_blank_lines() {
        let summarizer = ExcerptSummarizer::new(ExcerptConfig {
            max_lines: 2,
            max_chars: 400,
        });
        let text = "\n//! Parser entry point.\n\nuse std::io;   \nfn main() {}\n";

        let entry = summarizer.summarize_file("main.rs", text).await.unwrap();
        assert_eq!(entry, "### main.rs\n//! Parser entry point.\nuse std::io;");
    }

    #[tokio::test]
    async fn empty_file_is_marked() {
        let entry = ExcerptSummarizer::default()
            .summarize_file("empty.rs", "  \n\n")
            .await
            .unwrap();
        assert_eq!(entry, "### empty.rs\n(empty file)");
    }

    #[tokio::test]
    async fn file_entry_never_contains_a_blank_line() {
        let entry = ExcerptSummarizer::default()
            .summarize_file("a.py", "import os\n\n\nprint(1)\n")
            .await
            .unwrap();
        assert!(!entry.contains(ENTRY_SEPARATOR));
    }

    #[tokio::test]
    async fn index_summary_lists_files_and_folders() {
        let document = "### a.rs\nfn a\n\n## folder : util\n\nContains 1 file (io.rs).\n\n### b.rs\nfn b";
        let summary = ExcerptSummarizer::default()
            .summarize_index(document)
            .await
            .unwrap();
        assert_eq!(summary, "Contains 2 files (a.rs, b.rs) and 1 folder (util).");
    }

    #[tokio::test]
    async fn index_summary_of_empty_document() {
        let summary = ExcerptSummarizer::default()
            .summarize_index("")
            .await
            .unwrap();
        assert_eq!(summary, "(empty folder)");
    }

    #[tokio::test]
    async fn index_summary_falls_back_to_first_line() {
        let summary = ExcerptSummarizer::default()
            .summarize_index("\n  Handwritten notes about this folder\nmore")
            .await
            .unwrap();
        assert_eq!(summary, "Handwritten notes about this folder");
    }

    #[test]
    fn long_name_lists_are_elided() {
        let names: Vec<String> = (0..10).map(|i| format!("f{i}.rs")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(
            describe(refs.len(), "file", &refs),
            "10 files (f0.rs, f1.rs, f2.rs, f3.rs, f4.rs, f5.rs, f6.rs, f7.rs, …)"
        );
    }
}
