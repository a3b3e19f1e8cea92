use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::Path;
use std::str::FromStr;

use crate::fs::{ChildEntry, ChildKind};

/// Order in which a directory's children become entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryOrder {
    /// Byte-wise by name, directories and files interleaved.
    #[default]
    Name,
    /// Directories first, then files, each group by name.
    DirsFirst,
    /// Whatever order the filesystem listing yields. Not reproducible across machines.
    Native,
}

impl EntryOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntryOrder::Name => "name",
            EntryOrder::DirsFirst => "dirs-first",
            EntryOrder::Native => "native",
        }
    }

    pub fn apply(self, children: &mut [ChildEntry]) {
        match self {
            EntryOrder::Name => children.sort_by(|a, b| a.file_name.cmp(&b.file_name)),
            EntryOrder::DirsFirst => children.sort_by(|a, b| {
                match (is_dir_like(a.kind), is_dir_like(b.kind)) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => a.file_name.cmp(&b.file_name),
                }
            }),
            EntryOrder::Native => {}
        }
    }
}

impl FromStr for EntryOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(EntryOrder::Name),
            "dirs-first" | "dirs_first" => Ok(EntryOrder::DirsFirst),
            "native" => Ok(EntryOrder::Native),
            other => Err(format!(
                "unknown entry order '{other}' (expected name, dirs-first or native)"
            )),
        }
    }
}

// Symlinks are unresolved at sort time; group them with directories so a followed link to a
// directory lands where a real one would.
fn is_dir_like(kind: ChildKind) -> bool {
    matches!(kind, ChildKind::Directory | ChildKind::Symlink)
}

/// Extension of `file_name` including the leading dot, e.g. `".rs"`.
///
/// Dotfiles without a further extension (`.env`) have none.
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

/// Check if `file_name` carries one of `extensions` (ASCII case-insensitive).
pub fn is_source_file(file_name: &str, extensions: &[&str]) -> bool {
    let Some(ext) = file_extension(file_name) else {
        return false;
    };
    extensions
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(&ext))
}

/// Default set of summarizable extensions (code + docs + infra).
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    // General purpose languages
    ".rs", ".py", ".pyw", ".js", ".mjs", ".cjs", ".ts", ".tsx", ".jsx", ".java", ".kt", ".kts",
    ".go", ".c", ".h", ".cpp", ".cc", ".cxx", ".hpp", ".hh", ".hxx", ".cs", ".rb", ".swift",
    ".php", ".scala", ".dart", ".zig", ".lua", ".ex", ".exs", ".clj", ".fs", ".fsi", ".el",
    ".vue", ".svelte",
    // Scripts
    ".sh", ".bash", ".zsh", ".fish", ".ps1", ".bat", ".cmd",
    // Docs
    ".md", ".mdx", ".rst", ".adoc", ".txt",
    // Config / data / infra
    ".yaml", ".yml", ".json", ".toml", ".ini", ".cfg", ".conf", ".gradle", ".groovy", ".xml",
    ".html", ".css", ".scss", ".less", ".sql", ".tf", ".hcl", ".proto",
];
