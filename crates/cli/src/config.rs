use anyhow::{anyhow, bail, Context, Result};
use index_md_indexer::{EntryOrder, IndexerOptions, DEFAULT_INDEX_FILE_NAME, DEFAULT_MAX_DEPTH};
use index_md_summarizer::{ExcerptConfig, LlmConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const ENV_PREFIX: &str = "INDEX_MD_";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SummarizerKind {
    #[default]
    Excerpt,
    Llm,
}

impl FromStr for SummarizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excerpt" => Ok(SummarizerKind::Excerpt),
            "llm" => Ok(SummarizerKind::Llm),
            other => Err(format!(
                "unknown summarizer '{other}' (expected excerpt or llm)"
            )),
        }
    }
}

/// Settings resolved from defaults, the TOML config file and `INDEX_MD_*` variables.
/// Command-line flags are applied on top by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub index_file_name: String,
    pub order: EntryOrder,
    pub follow_symlinks: bool,
    pub max_depth: usize,
    pub ignored_names: Vec<String>,
    pub skip_empty_documents: bool,
    pub summarizer: SummarizerKind,
    pub excerpt: ExcerptConfig,
    pub llm: LlmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_file_name: DEFAULT_INDEX_FILE_NAME.to_string(),
            order: EntryOrder::default(),
            follow_symlinks: false,
            max_depth: DEFAULT_MAX_DEPTH,
            ignored_names: Vec::new(),
            skip_empty_documents: false,
            summarizer: SummarizerKind::default(),
            excerpt: ExcerptConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Config {
    /// Load `explicit` (which must exist) or the per-user config file when present, then apply
    /// environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}")).filter(|value| !value.trim().is_empty())
        };

        if let Some(value) = var("INDEX_FILE") {
            self.index_file_name = value;
        }
        if let Some(value) = var("ORDER") {
            self.order = value.parse().map_err(|err: String| anyhow!(err))?;
        }
        if let Some(value) = var("FOLLOW_SYMLINKS") {
            self.follow_symlinks = parse_bool(&value)
                .ok_or_else(|| anyhow!("{ENV_PREFIX}FOLLOW_SYMLINKS: expected a boolean"))?;
        }
        if let Some(value) = var("MAX_DEPTH") {
            self.max_depth = value
                .trim()
                .parse()
                .with_context(|| format!("{ENV_PREFIX}MAX_DEPTH: invalid number '{value}'"))?;
        }
        if let Some(value) = var("IGNORE") {
            self.ignored_names = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(value) = var("SUMMARIZER") {
            self.summarizer = value.parse().map_err(|err: String| anyhow!(err))?;
        }
        if let Some(value) = var("LLM_ENDPOINT") {
            self.llm.endpoint = value;
        }
        if let Some(value) = var("LLM_MODEL") {
            self.llm.model = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let name = self.index_file_name.as_str();
        if name.trim() != name {
            bail!("index_file_name must not have leading or trailing whitespace: '{name}'");
        }
        if name.is_empty() || name == "." || name == ".." {
            bail!("index_file_name must be a plain file name");
        }
        if name.contains('/') || name.contains('\\') {
            bail!("index_file_name must not contain path separators: {name}");
        }
        if self.excerpt.max_lines == 0 {
            bail!("excerpt.max_lines must be at least 1");
        }
        Ok(())
    }

    pub fn indexer_options(&self) -> IndexerOptions {
        IndexerOptions {
            index_file_name: self.index_file_name.clone(),
            order: self.order,
            follow_symlinks: self.follow_symlinks,
            max_depth: self.max_depth,
            ignored_names: self.ignored_names.clone(),
            skip_empty_documents: self.skip_empty_documents,
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("index-md").join("config.toml"))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn parses_toml_with_nested_sections() {
        let config: Config = toml::from_str(
            r#"
            index_file_name = "INDEX.md"
            order = "dirs-first"
            ignored_names = [".git", "target"]
            summarizer = "llm"

            [excerpt]
            max_lines = 3

            [llm]
            endpoint = "http://localhost:11434/v1"
            model = "llama3"
            "#,
        )
        .unwrap();

        assert_eq!(config.index_file_name, "INDEX.md");
        assert_eq!(config.order, EntryOrder::DirsFirst);
        assert_eq!(config.ignored_names, vec![".git", "target"]);
        assert_eq!(config.summarizer, SummarizerKind::Llm);
        assert_eq!(config.excerpt.max_lines, 3);
        assert_eq!(config.excerpt.max_chars, ExcerptConfig::default().max_chars);
        assert_eq!(config.llm.model, "llama3");
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Config>("unknown = 1").is_err());
        assert!(toml::from_str::<Config>("[llm]\nmodle = \"x\"").is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("INDEX_MD_ORDER", "native"),
                ("INDEX_MD_FOLLOW_SYMLINKS", "yes"),
                ("INDEX_MD_MAX_DEPTH", "7"),
                ("INDEX_MD_IGNORE", ".git, node_modules,,"),
                ("INDEX_MD_SUMMARIZER", "LLM"),
                ("INDEX_MD_LLM_MODEL", "local-model"),
                ("INDEX_MD_INDEX_FILE", ""),
            ]))
            .unwrap();

        assert_eq!(config.order, EntryOrder::Native);
        assert!(config.follow_symlinks);
        assert_eq!(config.max_depth, 7);
        assert_eq!(config.ignored_names, vec![".git", "node_modules"]);
        assert_eq!(config.summarizer, SummarizerKind::Llm);
        assert_eq!(config.llm.model, "local-model");
        assert_eq!(config.index_file_name, DEFAULT_INDEX_FILE_NAME);
    }

    #[test]
    fn invalid_env_values_fail() {
        let mut config = Config::default();
        assert!(config
            .apply_env(env(&[("INDEX_MD_MAX_DEPTH", "deep")]))
            .is_err());
        assert!(config
            .apply_env(env(&[("INDEX_MD_FOLLOW_SYMLINKS", "maybe")]))
            .is_err());
        assert!(config
            .apply_env(env(&[("INDEX_MD_ORDER", "random")]))
            .is_err());
    }

    #[test]
    fn index_file_name_must_be_plain() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.index_file_name = "nested/INDEX.md".to_string();
        assert!(config.validate().is_err());

        config.index_file_name = "  ".to_string();
        assert!(config.validate().is_err());

        config.index_file_name = " .Index.md ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn indexer_options_mirror_config() {
        let config = Config {
            follow_symlinks: true,
            max_depth: 3,
            ..Config::default()
        };
        let options = config.indexer_options();
        assert!(options.follow_symlinks);
        assert_eq!(options.max_depth, 3);
        assert_eq!(options.index_file_name, DEFAULT_INDEX_FILE_NAME);
    }
}
