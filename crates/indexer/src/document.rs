/// Default name of the per-directory index document.
pub const DEFAULT_INDEX_FILE_NAME: &str = ".Index.md";

/// Blank-line separator between entries.
pub const ENTRY_SEPARATOR: &str = "\n\n";

const FOLDER_HEADER_PREFIX: &str = "## folder : ";

/// One block of a directory's index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// Summary of one source file, rendered verbatim.
    File { file_name: String, text: String },
    /// Marker naming a subdirectory, emitted before descending into it.
    FolderHeader { name: String },
    /// Digest of a subdirectory's finished document, rendered verbatim.
    FolderSummary { name: String, text: String },
}

impl IndexEntry {
    pub fn render(&self) -> String {
        match self {
            IndexEntry::File { text, .. } | IndexEntry::FolderSummary { text, .. } => text.clone(),
            IndexEntry::FolderHeader { name } => format!("{FOLDER_HEADER_PREFIX}{name}"),
        }
    }
}

/// Ordered entries of a single directory.
///
/// Entries are append-only; the document is only ever read back as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexDocument {
    entries: Vec<IndexEntry>,
}

impl IndexDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: IndexEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join all entries with a single blank line. An empty document renders as `""`.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(IndexEntry::render)
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }
}

/// Subdirectory names announced by folder headers in a rendered document, in order.
pub fn folder_headers(text: &str) -> Vec<&str> {
    text.split(ENTRY_SEPARATOR)
        .filter_map(|block| block.strip_prefix(FOLDER_HEADER_PREFIX))
        .filter(|name| !name.contains('\n'))
        .collect()
}
