//! The extractor contract shared by every language.

use std::panic::{self, AssertUnwindSafe};

use super::{ExtractError, StructuralSummary};
use crate::config::ExtractOptions;

/// Language-specific structural extractor.
///
/// Implementations hold only immutable, precompiled rule tables, so one
/// instance can serve any number of concurrent `parse` calls.
pub trait LanguageExtractor: Send + Sync {
    /// Returns the language identifier (e.g., "java", "cpp").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this extractor handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Alternative language tags accepted by the registry (e.g., "c++").
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Run the recognizers. May fail on internal invariant violations.
    fn extract(
        &self,
        source: &str,
        options: &ExtractOptions,
    ) -> Result<StructuralSummary, ExtractError>;

    /// Extract a summary from `source`. Never fails and never panics.
    ///
    /// Errors and panics inside `extract` become a summary with empty
    /// collections and a single `PARSE_ERROR` diagnostic at 1:1.
    fn parse(&self, source: &str, options: &ExtractOptions) -> StructuralSummary {
        let language = self.language_id();
        match panic::catch_unwind(AssertUnwindSafe(|| self.extract(source, options))) {
            Ok(Ok(summary)) => summary,
            Ok(Err(err)) => {
                tracing::error!(language, error = %err, "extraction failed");
                StructuralSummary::parse_failure(language, err.to_string())
            }
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "extractor panicked".to_string());
                tracing::error!(language, %message, "extractor panicked");
                StructuralSummary::parse_failure(language, message)
            }
        }
    }

    /// Check if this extractor handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}
