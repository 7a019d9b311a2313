//! Language-specific extractor implementations.
//!
//! Each language keeps an ordered rule table over the shared `rules::Scan`
//! state. Register new extractors in `ExtractorRegistry::with_defaults`.

mod cpp;
mod java;
pub(crate) mod rules;

pub use cpp::CppExtractor;
pub use java::{is_external_import, JavaExtractor};
pub use rules::UNTERMINATED_BLOCK;
