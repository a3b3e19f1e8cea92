use std::ffi::OsStr;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use crate::document::{IndexDocument, IndexEntry, DEFAULT_INDEX_FILE_NAME};
use crate::error::{IndexerError, Result};
use crate::fs::{ChildEntry, ChildKind, IndexFs, LocalFs};
use crate::scanner::{is_source_file, EntryOrder};
use crate::stats::IndexStats;
use crate::summarize::{ContentSummarizer, IndexSummarizer};

/// Default recursion cap, counted in directories below the root.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Traversal policy for [`TreeIndexer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerOptions {
    /// Name of the document written into every directory.
    pub index_file_name: String,
    pub order: EntryOrder,
    /// Descend into symlinked directories. Symlinked files are always read.
    pub follow_symlinks: bool,
    /// Directories nested deeper than this below the root fail the run.
    pub max_depth: usize,
    /// Child names that are skipped entirely (no header, no entry).
    pub ignored_names: Vec<String>,
    /// Do not persist documents with no entries; a stale one left behind is removed.
    pub skip_empty_documents: bool,
}

impl Default for IndexerOptions {
    fn default() -> Self {
        Self {
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            order: EntryOrder::default(),
            follow_symlinks: false,
            max_depth: DEFAULT_MAX_DEPTH,
            ignored_names: Vec::new(),
            skip_empty_documents: false,
        }
    }
}

type DirFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Builds one index document per directory by folding subdirectory documents bottom-up.
pub struct TreeIndexer {
    fs: Arc<dyn IndexFs>,
    content: Arc<dyn ContentSummarizer>,
    index: Arc<dyn IndexSummarizer>,
    options: IndexerOptions,
}

/// Per-run traversal state threaded through the recursion.
struct Walk {
    stats: IndexStats,
    /// Canonical paths of the directories currently being processed, root first.
    /// Only tracked while following symlinks.
    ancestors: Vec<PathBuf>,
}

impl TreeIndexer {
    /// Create an indexer over the local filesystem with default options.
    pub fn new(content: Arc<dyn ContentSummarizer>, index: Arc<dyn IndexSummarizer>) -> Self {
        Self {
            fs: Arc::new(LocalFs),
            content,
            index,
            options: IndexerOptions::default(),
        }
    }

    #[must_use]
    pub fn with_fs(mut self, fs: Arc<dyn IndexFs>) -> Self {
        self.fs = fs;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: IndexerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &IndexerOptions {
        &self.options
    }

    /// Location of the index document for `dir`.
    pub fn index_file_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.options.index_file_name)
    }

    /// Index `path` and every directory below it.
    ///
    /// Each directory's document is written only after all of its subdirectories have been
    /// written and folded in. The first failure aborts the whole run: documents finished before
    /// it stay on disk, nothing above the failing directory is written.
    pub async fn index_directory(&self, path: impl AsRef<Path>) -> Result<IndexStats> {
        let start = Instant::now();
        let root = path.as_ref().to_path_buf();

        match self.fs.kind(&root).await {
            Ok(ChildKind::Directory) => {}
            Ok(_) => {
                return Err(IndexerError::InvalidPath(format!(
                    "Not a directory: {}",
                    root.display()
                )))
            }
            Err(err) => return Err(IndexerError::not_found(&root, err)),
        }

        let mut walk = Walk {
            stats: IndexStats::new(),
            ancestors: Vec::new(),
        };
        if self.options.follow_symlinks {
            let canonical = self
                .fs
                .canonicalize(&root)
                .await
                .map_err(|err| IndexerError::not_found(&root, err))?;
            walk.ancestors.push(canonical);
        }

        log::info!("Indexing tree at {}", root.display());
        self.process_directory(&root, 0, &mut walk).await?;

        let mut stats = walk.stats;
        stats.time_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        log::info!("Indexing completed: {stats:?}");
        Ok(stats)
    }

    fn process_directory<'a>(
        &'a self,
        dir: &'a Path,
        depth: usize,
        walk: &'a mut Walk,
    ) -> DirFuture<'a> {
        Box::pin(async move {
            if depth > self.options.max_depth {
                return Err(IndexerError::DepthLimit {
                    path: dir.to_path_buf(),
                    max_depth: self.options.max_depth,
                });
            }

            log::info!("Processing {}", dir.display());
            let mut children = self
                .fs
                .list_dir(dir)
                .await
                .map_err(|err| IndexerError::not_found(dir, err))?;
            self.options.order.apply(&mut children);

            let mut document = IndexDocument::new();
            for child in &children {
                self.process_child(dir, child, depth, &mut document, walk)
                    .await?;
            }

            self.persist(dir, &document).await?;
            walk.stats.add_directory();
            Ok(())
        })
    }

    async fn process_child(
        &self,
        dir: &Path,
        child: &ChildEntry,
        depth: usize,
        document: &mut IndexDocument,
        walk: &mut Walk,
    ) -> Result<()> {
        let path = dir.join(&child.file_name);

        if child.file_name.as_os_str() == OsStr::new(&self.options.index_file_name)
            || self.is_ignored(&child.file_name)
        {
            log::debug!("Skipping {}", path.display());
            walk.stats.add_skipped();
            return Ok(());
        }

        let kind = match child.kind {
            ChildKind::Symlink => match self.fs.kind(&path).await {
                Ok(ChildKind::Directory) if !self.options.follow_symlinks => {
                    log::debug!("Skipping directory symlink {}", path.display());
                    walk.stats.add_skipped();
                    return Ok(());
                }
                Ok(kind) => kind,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    log::warn!("Skipping dangling symlink {}", path.display());
                    walk.stats.add_skipped();
                    return Ok(());
                }
                Err(err) => return Err(IndexerError::not_found(&path, err)),
            },
            kind => kind,
        };

        match kind {
            ChildKind::Directory => {
                self.fold_subdirectory(&child.name, &path, depth, document, walk)
                    .await
            }
            ChildKind::File if is_source_file(&child.name, self.content.supported_extensions()) => {
                let raw = self
                    .fs
                    .read_to_string(&path)
                    .await
                    .map_err(|err| IndexerError::not_found(&path, err))?;
                let text = self
                    .content
                    .summarize_file(&child.name, &raw)
                    .await
                    .map_err(|err| IndexerError::summarization(&path, err))?;
                document.push(IndexEntry::File {
                    file_name: child.name.clone(),
                    text,
                });
                walk.stats.add_file();
                Ok(())
            }
            _ => {
                log::debug!("Skipping unsupported {}", path.display());
                walk.stats.add_skipped();
                Ok(())
            }
        }
    }

    /// Header, full descent, then the summary of the child's finished document.
    async fn fold_subdirectory(
        &self,
        name: &str,
        path: &Path,
        depth: usize,
        document: &mut IndexDocument,
        walk: &mut Walk,
    ) -> Result<()> {
        let tracked = if self.options.follow_symlinks {
            let canonical = self
                .fs
                .canonicalize(path)
                .await
                .map_err(|err| IndexerError::not_found(path, err))?;
            if walk.ancestors.contains(&canonical) {
                log::warn!(
                    "Skipping {}: directory cycle back to {}",
                    path.display(),
                    canonical.display()
                );
                walk.stats.add_skipped();
                return Ok(());
            }
            walk.ancestors.push(canonical);
            true
        } else {
            false
        };

        document.push(IndexEntry::FolderHeader {
            name: name.to_string(),
        });
        let descended = self.process_directory(path, depth + 1, walk).await;
        if tracked {
            walk.ancestors.pop();
        }
        descended?;

        let sub_index = self.index_file_path(path);
        let present = self
            .fs
            .exists(&sub_index)
            .await
            .map_err(|err| IndexerError::not_found(&sub_index, err))?;
        if !present {
            log::debug!("No index document under {}", path.display());
            return Ok(());
        }

        let text = self
            .fs
            .read_to_string(&sub_index)
            .await
            .map_err(|err| IndexerError::not_found(&sub_index, err))?;
        let summary = self
            .index
            .summarize_index(&text)
            .await
            .map_err(|err| IndexerError::summarization(&sub_index, err))?;
        document.push(IndexEntry::FolderSummary {
            name: name.to_string(),
            text: summary,
        });
        walk.stats.add_folder_summary();
        Ok(())
    }

    async fn persist(&self, dir: &Path, document: &IndexDocument) -> Result<()> {
        let index_path = self.index_file_path(dir);

        if document.is_empty() && self.options.skip_empty_documents {
            let stale = self
                .fs
                .exists(&index_path)
                .await
                .map_err(|err| IndexerError::not_found(&index_path, err))?;
            if stale {
                log::info!("Removing stale empty index {}", index_path.display());
                self.fs
                    .remove_file(&index_path)
                    .await
                    .map_err(|source| IndexerError::Write {
                        path: index_path.clone(),
                        source,
                    })?;
            }
            return Ok(());
        }

        self.fs
            .write_string(&index_path, &document.to_text())
            .await
            .map_err(|source| IndexerError::Write {
                path: index_path.clone(),
                source,
            })?;
        log::info!(
            "Wrote {} ({} entries)",
            index_path.display(),
            document.entries().len()
        );
        Ok(())
    }

    fn is_ignored(&self, name: &OsStr) -> bool {
        self.options
            .ignored_names
            .iter()
            .any(|ignored| OsStr::new(ignored) == name)
    }
}
