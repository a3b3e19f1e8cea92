use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use index_md_indexer::{ContentSummarizer, IndexStats, IndexSummarizer, TreeIndexer};
use index_md_summarizer::{ExcerptSummarizer, LlmSummarizer};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{Config, SummarizerKind};
use crate::flags::{OrderFlag, SummarizerFlag};

mod config;
mod flags;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "index-md")]
#[command(about = "Write a summarized index document into every directory of a tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (defaults to <config dir>/index-md/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a directory tree, writing one index document per directory
    Index(IndexArgs),
}

#[derive(Args)]
struct IndexArgs {
    /// Root directory to index (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Summarizer backend
    #[arg(long, value_enum)]
    summarizer: Option<SummarizerFlag>,

    /// Order of entries within each document
    #[arg(long, value_enum)]
    order: Option<OrderFlag>,

    /// Follow symlinked files and directories (cycles are skipped)
    #[arg(long)]
    follow_symlinks: bool,

    /// Fail when directories are nested deeper than this below the root
    #[arg(long)]
    max_depth: Option<usize>,

    /// Name of the index document written into each directory
    #[arg(long)]
    index_file: Option<String>,

    /// Child names to skip entirely (comma-separated, replaces configured list)
    #[arg(long, value_delimiter = ',')]
    ignore: Vec<String>,

    /// Do not write documents for directories without entries
    #[arg(long)]
    skip_empty: bool,

    /// Print run statistics as JSON on stdout
    #[arg(long)]
    json: bool,
}

impl IndexArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(summarizer) = self.summarizer {
            config.summarizer = summarizer.as_domain();
        }
        if let Some(order) = self.order {
            config.order = order.as_domain();
        }
        if self.follow_symlinks {
            config.follow_symlinks = true;
        }
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(name) = &self.index_file {
            config.index_file_name = name.clone();
        }
        if !self.ignore.is_empty() {
            config.ignored_names = self.ignore.clone();
        }
        if self.skip_empty {
            config.skip_empty_documents = true;
        }
    }
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // HTTP client internals are only interesting when debugging the LLM backend
    if !cli.verbose {
        builder.filter_module("reqwest", log::LevelFilter::Warn);
        builder.filter_module("hyper", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Index(args) => run_index(args, config).await?,
    }
    Ok(())
}

fn build_summarizers(
    config: &Config,
) -> Result<(Arc<dyn ContentSummarizer>, Arc<dyn IndexSummarizer>)> {
    match config.summarizer {
        SummarizerKind::Excerpt => {
            let summarizer = Arc::new(ExcerptSummarizer::new(config.excerpt.clone()));
            let content: Arc<dyn ContentSummarizer> = summarizer.clone();
            let index: Arc<dyn IndexSummarizer> = summarizer;
            Ok((content, index))
        }
        SummarizerKind::Llm => {
            let summarizer = Arc::new(
                LlmSummarizer::new(config.llm.clone())
                    .context("Failed to build LLM summarizer")?,
            );
            let content: Arc<dyn ContentSummarizer> = summarizer.clone();
            let index: Arc<dyn IndexSummarizer> = summarizer;
            Ok((content, index))
        }
    }
}

/// Index a directory tree
async fn run_index(args: IndexArgs, mut config: Config) -> Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let path = args
        .path
        .canonicalize()
        .with_context(|| format!("Invalid directory path {}", args.path.display()))?;
    let (content, index) = build_summarizers(&config)?;
    let indexer = TreeIndexer::new(content, index).with_options(config.indexer_options());

    let stats = indexer
        .index_directory(&path)
        .await
        .with_context(|| format!("Failed to index {}", path.display()))?;

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&stats)?)?;
    } else {
        eprintln!("{}", describe_stats(&stats));
    }
    Ok(())
}

fn describe_stats(stats: &IndexStats) -> String {
    format!(
        "Indexed {} directories ({} files, {} folder summaries, {} skipped) in {}ms",
        stats.directories,
        stats.files_summarized,
        stats.folders_summarized,
        stats.skipped,
        stats.time_ms
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_md_indexer::EntryOrder;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "index-md",
            "index",
            "some/dir",
            "--order",
            "dirs-first",
            "--summarizer",
            "llm",
            "--ignore",
            ".git,target",
            "--max-depth",
            "4",
            "--skip-empty",
        ])
        .unwrap();
        let Commands::Index(args) = cli.command;

        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(args.path, PathBuf::from("some/dir"));
        assert_eq!(config.order, EntryOrder::DirsFirst);
        assert_eq!(config.summarizer, SummarizerKind::Llm);
        assert_eq!(config.ignored_names, vec![".git", "target"]);
        assert_eq!(config.max_depth, 4);
        assert!(config.skip_empty_documents);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["index-md", "index"]).unwrap();
        let Commands::Index(args) = cli.command;

        let mut config = Config {
            ignored_names: vec!["vendor".to_string()],
            order: EntryOrder::Native,
            ..Config::default()
        };
        args.apply(&mut config);

        assert_eq!(config.ignored_names, vec!["vendor"]);
        assert_eq!(config.order, EntryOrder::Native);
    }

    #[test]
    fn stats_line_names_every_counter() {
        let stats = IndexStats {
            directories: 3,
            files_summarized: 5,
            folders_summarized: 2,
            skipped: 1,
            time_ms: 12,
        };
        assert_eq!(
            describe_stats(&stats),
            "Indexed 3 directories (5 files, 2 folder summaries, 1 skipped) in 12ms"
        );
    }
}
