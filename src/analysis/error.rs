//! Error types for extraction and dispatch.

use thiserror::Error;

/// Internal failures while extracting one file.
///
/// These never reach `parse` callers; the extractor boundary turns them into
/// a `PARSE_ERROR` summary.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("span {start}..{end} is out of bounds for text of length {len}")]
    Span { start: usize, end: usize, len: usize },
    #[error("masked text is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("invalid recognizer pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("internal extractor error: {0}")]
    Internal(String),
}

/// Dispatcher lookup failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unsupported language: {0:?}")]
    UnsupportedLanguage(String),
    #[error("no extractor for file extension {0:?}")]
    UnsupportedExtension(String),
}
