//! Configuration for extraction and the batch driver.
//!
//! `ExtractOptions` is the per-call configuration every extractor accepts.
//! `Config` is the optional `codeshape.yaml` file read by the CLI.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codeshape.yaml", ".codeshape.yaml"];

/// Default upper bound on input size accepted by the batch driver.
pub const DEFAULT_MAX_FILE_BYTES: usize = 2 * 1024 * 1024;

/// Options passed to `LanguageExtractor::parse`.
///
/// Absent options behave exactly like `ExtractOptions::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Emit a debug event for every recognized declaration.
    pub verbose: bool,
}

/// Top-level config file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Files larger than this are skipped.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
    /// Glob patterns for paths to exclude (e.g., "**/generated/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Restrict analysis to these language ids (empty: all registered).
    #[serde(default)]
    pub languages: Vec<String>,
    /// Parse files on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default)]
    pub options: ExtractOptions,
}

fn default_max_file_bytes() -> usize {
    DEFAULT_MAX_FILE_BYTES
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            excluded_paths: Vec::new(),
            languages: Vec::new(),
            parallel: true,
            options: ExtractOptions::default(),
        }
    }
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    /// Uses globset for matching, which supports `**` for recursive directory matching.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether `language` is enabled by the `languages` filter.
    pub fn is_language_enabled(&self, language: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == language)
    }
}

/// Discover a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Validate a config for correctness.
pub fn validate(config: &Config, known_languages: &[&str]) -> anyhow::Result<()> {
    if config.max_file_bytes == 0 {
        anyhow::bail!("max_file_bytes must be greater than zero");
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    for language in &config.languages {
        if !known_languages.contains(&language.as_str()) {
            anyhow::bail!(
                "unknown language {:?} (known: {})",
                language,
                known_languages.join(", ")
            );
        }
    }

    Ok(())
}
