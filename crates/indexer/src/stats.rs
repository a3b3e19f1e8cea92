use serde::{Deserialize, Serialize};

/// Statistics about an indexing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Index documents written
    pub directories: usize,

    /// Files passed to the content summarizer
    pub files_summarized: usize,

    /// Child documents passed to the index summarizer
    pub folders_summarized: usize,

    /// Children that produced no entry (unsupported, symlinks, cycles, ignored names)
    pub skipped: usize,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl IndexStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_directory(&mut self) {
        self.directories += 1;
    }

    pub fn add_file(&mut self) {
        self.files_summarized += 1;
    }

    pub fn add_folder_summary(&mut self) {
        self.folders_summarized += 1;
    }

    pub fn add_skipped(&mut self) {
        self.skipped += 1;
    }
}
