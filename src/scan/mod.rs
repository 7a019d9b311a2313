//! Text-scanning primitives shared by every language extractor.
//!
//! None of these build a syntax tree. They work on raw or masked source text:
//!
//! - `source`: comment/literal masking pre-pass and offset → line mapping
//! - `brackets`: literal-aware delimiter matching and enclosing-block lookup
//! - `complexity`: heuristic branch counting
//! - `dependencies`: call / field / construction name collection
//! - `docstring`: preceding comment block association
//! - `naming`: suggested test identifiers
//! - `params`: parameter list parsing
//! - `diagnostics`: per-line syntax hints

pub mod brackets;
pub mod complexity;
pub mod dependencies;
pub mod diagnostics;
pub mod docstring;
pub mod naming;
pub mod params;
pub mod source;

pub use brackets::{find_matching, match_delimiter, skip_whitespace, BraceIndex, BracketMatch};
pub use dependencies::{DependencyCollector, DependencyRules};
pub use diagnostics::{check_lines, LineHints, LineRules, MISSING_TERMINATOR, UNBALANCED_PARENS};
pub use docstring::find_docstring;
pub use naming::{accessor_kind, test_candidates, AccessorKind, CandidateStyle};
pub use params::{parse_parameter_list, ParamSyntax};
pub use source::{LineIndex, MaskRules, SourceText};
