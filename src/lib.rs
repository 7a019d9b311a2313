//! codeshape - heuristic structural extraction for Java and C++.
//!
//! Produces a `StructuralSummary` per source file: functions, classes,
//! imports, exports, complexity scores, dependencies, docstrings, suggested
//! test names and best-effort syntax hints. No compiler front end is
//! involved; every extractor runs ordered regex rules over a masked copy of
//! the source.
//!
//! # Architecture
//!
//! - `scan`: shared text primitives (masking, bracket matching, complexity,
//!   dependencies, docstrings, parameters, test names, line diagnostics)
//! - `analysis`: the data model, the `LanguageExtractor` contract, the Java
//!   and C++ extractors, the registry and the file/batch driver
//! - `config`: extraction options and the `codeshape.yaml` file
//! - `report`: output formatting (pretty, JSON)
//!
//! # Example
//!
//! ```
//! use codeshape::{ExtractOptions, ExtractorRegistry};
//!
//! let registry = ExtractorRegistry::with_defaults();
//! let summary = registry
//!     .parse("java", "public int add(int a, int b) { return a + b; }", &ExtractOptions::default())
//!     .unwrap();
//! assert_eq!(summary.functions[0].name, "add");
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod report;
pub mod scan;

pub use analysis::{
    AnalysisContext, ClassInfo, CppExtractor, Diagnostic, ExtractorRegistry, FileSummary,
    FunctionInfo, ImportInfo, JavaExtractor, LanguageExtractor, StructuralSummary,
};
pub use config::{Config, ExtractOptions};
