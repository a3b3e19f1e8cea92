use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a directory child as reported by the listing, without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// One immediate child of a listed directory.
///
/// `file_name` is the name as stored on disk and is what paths are built from. `name` is its
/// UTF-8 rendering (lossy) used in document entries and passed to summarizers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub file_name: OsString,
    pub kind: ChildKind,
}

impl ChildEntry {
    pub fn new(name: impl Into<String>, kind: ChildKind) -> Self {
        let name = name.into();
        Self {
            file_name: OsString::from(&name),
            name,
            kind,
        }
    }

    pub fn from_os(file_name: OsString, kind: ChildKind) -> Self {
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            kind,
        }
    }
}

/// Filesystem primitives the indexer needs.
#[async_trait]
pub trait IndexFs: Send + Sync {
    /// Immediate children of `dir`, in whatever order the backend yields them.
    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<ChildEntry>>;

    /// Kind of `path` after following symlinks.
    async fn kind(&self, path: &Path) -> io::Result<ChildKind>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the content of `path`. Readers never observe a partially written file.
    async fn write_string(&self, path: &Path, text: &str) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;

    async fn exists(&self, path: &Path) -> io::Result<bool>;

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

/// [`IndexFs`] backed by the local filesystem through `tokio::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

#[async_trait]
impl IndexFs for LocalFs {
    async fn list_dir(&self, dir: &Path) -> io::Result<Vec<ChildEntry>> {
        let mut children = Vec::new();
        let mut entries = tokio::fs::read_dir(dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_type = entry.file_type().await?;
            let kind = if file_type.is_symlink() {
                ChildKind::Symlink
            } else if file_type.is_dir() {
                ChildKind::Directory
            } else if file_type.is_file() {
                ChildKind::File
            } else {
                ChildKind::Other
            };
            children.push(ChildEntry::from_os(entry.file_name(), kind));
        }
        Ok(children)
    }

    async fn kind(&self, path: &Path) -> io::Result<ChildKind> {
        let meta = tokio::fs::metadata(path).await?;
        Ok(if meta.is_dir() {
            ChildKind::Directory
        } else if meta.is_file() {
            ChildKind::File
        } else {
            ChildKind::Other
        })
    }

    // Invalid UTF-8 sequences become U+FFFD instead of failing the read.
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let bytes = tokio::fs::read(path).await?;
        Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    async fn write_string(&self, path: &Path, text: &str) -> io::Result<()> {
        let tmp = tmp_path_for(path);
        tokio::fs::write(&tmp, text).await?;
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(err);
        }
        Ok(())
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        tokio::fs::canonicalize(path).await
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
