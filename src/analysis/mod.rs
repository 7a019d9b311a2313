//! Structural extraction.
//!
//! Turns raw source text into a `StructuralSummary`: functions, classes,
//! imports, exports and line diagnostics.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌───────────────────┐
//! │ Source text  │────▶│ ExtractorRegistry │────▶│ LanguageExtractor │
//! └──────────────┘     │ (language / ext)  │     │ (Java, C++)       │
//!                      └───────────────────┘     └───────────────────┘
//!                                                          │
//!                                                          ▼
//!                      ┌───────────────────┐     ┌───────────────────┐
//!                      │ AnalysisContext   │◀────│ StructuralSummary │
//!                      │ (files, batches)  │     └───────────────────┘
//!                      └───────────────────┘
//! ```
//!
//! # Adding a New Language
//!
//! 1. Create a module in `src/analysis/languages/` with its rule table
//! 2. Implement `LanguageExtractor`
//! 3. Register it in `ExtractorRegistry::with_defaults`
//!
//! See `languages/java.rs` for a reference implementation.

mod context;
mod error;
mod languages;
mod registry;
mod summary;
mod traits;

pub use context::{collect_files, AnalysisContext, FileSummary};
pub use error::{ExtractError, RegistryError};
pub use languages::{is_external_import, CppExtractor, JavaExtractor, UNTERMINATED_BLOCK};
pub use registry::ExtractorRegistry;
pub use summary::{
    ClassInfo, ClassKind, Diagnostic, ExportInfo, ExportKind, FunctionInfo, ImportInfo,
    ImportSpecifier, ParameterInfo, PropertyInfo, Severity, StructuralSummary, Visibility,
    PARSE_ERROR,
};
pub use traits::LanguageExtractor;
