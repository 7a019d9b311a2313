//! Dispatcher from language tags and file extensions to extractors.
//!
//! The registry is an ordinary value: build it once at startup and pass it
//! by reference to whatever needs to parse.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use super::{CppExtractor, JavaExtractor, LanguageExtractor, RegistryError, StructuralSummary};
use crate::config::ExtractOptions;

/// Mapping from language identifier (and alias or extension) to extractor.
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: Vec<Box<dyn LanguageExtractor>>,
    /// Lowercased id or alias to index in `extractors`.
    by_name: HashMap<String, usize>,
    /// Lowercased extension (without dot) to index in `extractors`.
    by_extension: HashMap<String, usize>,
}

impl ExtractorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in extractor.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JavaExtractor::new()));
        registry.register(Box::new(CppExtractor::new()));
        registry
    }

    /// Add an extractor. A later registration wins for any id, alias or
    /// extension it shares with an earlier one.
    pub fn register(&mut self, extractor: Box<dyn LanguageExtractor>) {
        let index = self.extractors.len();
        let names = std::iter::once(extractor.language_id())
            .chain(extractor.aliases().iter().copied());
        for name in names {
            self.by_name.insert(name.to_ascii_lowercase(), index);
        }
        for ext in extractor.file_extensions() {
            self.by_extension.insert(ext.to_ascii_lowercase(), index);
        }
        tracing::debug!(language = extractor.language_id(), "registered extractor");
        self.extractors.push(extractor);
    }

    /// Look up an extractor by language id or alias, ignoring case.
    pub fn get(&self, language: &str) -> Result<&dyn LanguageExtractor, RegistryError> {
        self.by_name
            .get(&language.trim().to_ascii_lowercase())
            .map(|&i| self.extractors[i].as_ref())
            .ok_or_else(|| RegistryError::UnsupportedLanguage(language.to_string()))
    }

    /// Look up an extractor by file extension (with or without the dot).
    pub fn for_extension(&self, ext: &str) -> Result<&dyn LanguageExtractor, RegistryError> {
        let key = ext.trim_start_matches('.').to_ascii_lowercase();
        self.by_extension
            .get(&key)
            .map(|&i| self.extractors[i].as_ref())
            .ok_or_else(|| RegistryError::UnsupportedExtension(ext.to_string()))
    }

    /// Look up an extractor from a path's extension.
    pub fn for_path(&self, path: &Path) -> Result<&dyn LanguageExtractor, RegistryError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        self.for_extension(ext)
    }

    /// Parse `source` with the extractor registered for `language`.
    pub fn parse(
        &self,
        language: &str,
        source: &str,
        options: &ExtractOptions,
    ) -> Result<StructuralSummary, RegistryError> {
        Ok(self.get(language)?.parse(source, options))
    }

    /// Registered language ids, in registration order.
    pub fn languages(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.language_id()).collect()
    }

    /// Every registered extractor, in registration order.
    pub fn extractors(&self) -> impl Iterator<Item = &dyn LanguageExtractor> {
        self.extractors.iter().map(|e| e.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("languages", &self.languages())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.languages(), vec!["java", "cpp"]);
        assert!(!registry.is_empty());
        assert!(ExtractorRegistry::new().is_empty());
    }

    #[test]
    fn test_lookup_by_language_and_alias() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.get("java").unwrap().language_id(), "java");
        assert_eq!(registry.get("JAVA").unwrap().language_id(), "java");
        assert_eq!(registry.get("c++").unwrap().language_id(), "cpp");
        assert_eq!(registry.get("cxx").unwrap().language_id(), "cpp");
        assert_eq!(
            registry.get("cobol").err(),
            Some(RegistryError::UnsupportedLanguage("cobol".to_string()))
        );
    }

    #[test]
    fn test_lookup_by_extension() {
        let registry = ExtractorRegistry::with_defaults();
        assert_eq!(registry.for_extension("java").unwrap().language_id(), "java");
        assert_eq!(registry.for_extension(".HPP").unwrap().language_id(), "cpp");
        assert_eq!(
            registry.for_path(Path::new("src/widget.cc")).unwrap().language_id(),
            "cpp"
        );
        assert!(matches!(
            registry.for_path(Path::new("README")),
            Err(RegistryError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_parse_dispatches() {
        let registry = ExtractorRegistry::with_defaults();
        let options = ExtractOptions::default();

        let summary = registry
            .parse("java", "public int add(int a, int b) { return a + b; }", &options)
            .unwrap();
        assert_eq!(summary.language, "java");
        assert_eq!(summary.functions.len(), 1);

        let summary = registry.parse("c++", "int main() { return 0; }", &options).unwrap();
        assert_eq!(summary.language, "cpp");
        assert_eq!(summary.functions[0].name, "main");

        assert!(registry.parse("go", "", &options).is_err());
    }
}
