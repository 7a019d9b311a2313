//! File and batch driver around the extractor registry.
//!
//! The AnalysisContext provides:
//! - Language selection by extension (or an explicit tag)
//! - Input size bounds and the `languages` filter from `Config`
//! - Sequential and parallel batch analysis with deterministic ordering

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::analysis::{ExtractorRegistry, RegistryError, StructuralSummary};
use crate::config::Config;

/// Directories never descended into by `collect_files`.
const SKIPPED_DIRS: &[&str] = &["vendor", "node_modules", "third_party", "target", "build"];

/// The summary of one file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSummary {
    pub path: String,
    #[serde(flatten)]
    pub summary: StructuralSummary,
}

/// Analysis context for a set of files.
///
/// Borrows the registry and configuration; holds no mutable state, so one
/// context can be shared across the rayon pool.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    registry: &'a ExtractorRegistry,
    config: &'a Config,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(registry: &'a ExtractorRegistry, config: &'a Config) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'a ExtractorRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    /// Parse in-memory text tagged with a language id or alias.
    pub fn analyze_source(
        &self,
        language: &str,
        source: &str,
    ) -> Result<StructuralSummary, RegistryError> {
        self.registry.parse(language, source, &self.config.options)
    }

    /// Analyze a file, picking the extractor from its extension.
    ///
    /// Returns `Ok(None)` for files skipped by configuration (disabled
    /// language or larger than `max_file_bytes`).
    pub fn analyze_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<Option<FileSummary>> {
        self.analyze_file_as(path, None)
    }

    /// Analyze a file, optionally forcing the language instead of using the
    /// extension.
    pub fn analyze_file_as<P: AsRef<Path>>(
        &self,
        path: P,
        language: Option<&str>,
    ) -> anyhow::Result<Option<FileSummary>> {
        let path = path.as_ref();
        let extractor = match language {
            Some(language) => self.registry.get(language)?,
            None => self.registry.for_path(path)?,
        };

        if !self.config.is_language_enabled(extractor.language_id()) {
            tracing::debug!(
                path = %path.display(),
                language = extractor.language_id(),
                "language disabled, skipping"
            );
            return Ok(None);
        }

        let metadata =
            fs::metadata(path).with_context(|| format!("reading {}", path.display()))?;
        if metadata.len() > self.config.max_file_bytes as u64 {
            tracing::warn!(
                path = %path.display(),
                bytes = metadata.len(),
                limit = self.config.max_file_bytes,
                "file exceeds max_file_bytes, skipping"
            );
            return Ok(None);
        }

        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let source = String::from_utf8_lossy(&bytes);
        let summary = extractor.parse(&source, &self.config.options);
        if summary.is_parse_failure() {
            tracing::warn!(path = %path.display(), "extractor failed, reporting PARSE_ERROR");
        }

        Ok(Some(FileSummary {
            path: path.to_string_lossy().to_string(),
            summary,
        }))
    }

    /// Analyze multiple files.
    ///
    /// Processes files sequentially. Files that fail to read are logged and
    /// left out. Results are sorted by path.
    pub fn analyze_files(&self, paths: &[PathBuf]) -> Vec<FileSummary> {
        let results = paths.iter().map(|p| (p, self.analyze_file(p))).collect();
        collect_results(results)
    }

    /// Analyze multiple files in parallel.
    ///
    /// Uses rayon for parallel processing. Results are sorted by path.
    pub fn analyze_files_parallel(&self, paths: &[PathBuf]) -> Vec<FileSummary> {
        use rayon::prelude::*;

        let results = paths
            .par_iter()
            .map(|p| (p, self.analyze_file(p)))
            .collect();
        collect_results(results)
    }

    /// Analyze multiple files, in parallel when `Config::parallel` is set.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Vec<FileSummary> {
        if self.config.parallel {
            self.analyze_files_parallel(paths)
        } else {
            self.analyze_files(paths)
        }
    }
}

fn collect_results(
    results: Vec<(&PathBuf, anyhow::Result<Option<FileSummary>>)>,
) -> Vec<FileSummary> {
    let mut summaries = Vec::new();
    for (path, result) in results {
        match result {
            Ok(Some(summary)) => summaries.push(summary),
            Ok(None) => {}
            Err(e) => {
                // Log but don't fail - one unreadable file shouldn't sink the batch
                tracing::warn!(path = %path.display(), error = %e, "failed to analyze file");
            }
        }
    }

    // Sort by path for deterministic ordering
    summaries.sort_by(|a, b| a.path.cmp(&b.path));
    summaries
}

/// Collect the files under `root` that some registered extractor handles.
///
/// Hidden and vendored directories are skipped, as are paths matched by
/// `excluded_paths` and languages outside the `languages` filter.
pub fn collect_files(
    root: &Path,
    registry: &ExtractorRegistry,
    config: &Config,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref())
        })
    {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Ok(extractor) = registry.for_path(path) else {
            continue;
        };
        if !config.is_language_enabled(extractor.language_id()) || config.is_path_excluded(path) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    files.sort();
    Ok(files)
}
