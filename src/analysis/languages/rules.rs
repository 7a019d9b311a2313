//! Declarative recognizer rules and the per-file scan state they write into.
//!
//! A language is an ordered list of `Rule`s. Each rule is a compiled pattern
//! plus an extraction fn; the runner feeds every match of every rule, in list
//! order, to its fn. Rules that need block membership (methods, fields) come
//! after the rules that register blocks (classes, namespaces).

use std::collections::{BTreeMap, BTreeSet};

use regex::{Captures, Regex};

use crate::analysis::{
    ClassInfo, Diagnostic, ExportInfo, ExportKind, ExtractError, FunctionInfo, ImportInfo,
    StructuralSummary, Visibility,
};
use crate::config::ExtractOptions;
use crate::scan::{complexity, find_docstring, match_delimiter, DependencyCollector, SourceText};

/// Diagnostic code for a declaration whose body never closes.
pub const UNTERMINATED_BLOCK: &str = "UNTERMINATED_BLOCK";

/// Which view of the file a rule's pattern runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Unmodified source (directives).
    Original,
    /// Comments and literal contents blanked (declarations).
    Masked,
}

/// One recognizer: a pattern and the fn that turns its matches into summary entries.
pub struct Rule {
    pub name: &'static str,
    pub view: View,
    pub pattern: &'static Regex,
    pub apply: fn(&mut Scan<'_>, &Captures<'_>) -> Result<(), ExtractError>,
}

/// Run `rules` in order over the views of `scan.src`.
pub fn run_rules(rules: &[Rule], scan: &mut Scan<'_>) -> Result<(), ExtractError> {
    let src = scan.src;
    for rule in rules {
        let text = match rule.view {
            View::Original => src.original,
            View::Masked => src.masked.as_str(),
        };
        for caps in rule.pattern.captures_iter(text) {
            (rule.apply)(scan, &caps)?;
        }
        tracing::trace!(rule = rule.name, "rule pass complete");
    }
    Ok(())
}

/// What a `{` at a known offset opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Class(usize),
    Namespace(Option<String>),
    Extern,
}

/// A class being assembled, with its body range.
#[derive(Debug)]
pub struct ClassDraft {
    pub info: ClassInfo,
    pub open: usize,
    pub close: usize,
    pub nested: bool,
    pub default_visibility: Visibility,
    /// `(offset, visibility)` of access labels directly in the body.
    pub access_labels: Vec<(usize, Visibility)>,
}

impl ClassDraft {
    /// Visibility in effect at `pos` inside the body.
    pub fn visibility_at(&self, pos: usize) -> Visibility {
        self.access_labels
            .iter()
            .take_while(|(offset, _)| *offset < pos)
            .last()
            .map(|(_, v)| *v)
            .unwrap_or(self.default_visibility)
    }
}

/// A `{ ... }` body located with the bracket matcher.
#[derive(Debug, Clone)]
pub struct Body {
    pub close: usize,
    pub terminated: bool,
    pub end_line: usize,
    pub complexity: u32,
    pub dependencies: BTreeSet<String>,
}

/// Mutable state for one extraction. Dropped when the summary is built.
pub struct Scan<'a> {
    pub src: &'a SourceText<'a>,
    pub options: &'a ExtractOptions,
    pub language: &'static str,
    pub deps: &'a DependencyCollector,
    pub package: Option<String>,
    pub classes: Vec<ClassDraft>,
    pub functions: Vec<FunctionInfo>,
    pub imports: Vec<ImportInfo>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub blocks: BTreeMap<usize, Block>,
}

impl<'a> Scan<'a> {
    pub fn new(
        src: &'a SourceText<'a>,
        options: &'a ExtractOptions,
        language: &'static str,
        deps: &'a DependencyCollector,
    ) -> Self {
        Self {
            src,
            options,
            language,
            deps,
            package: None,
            classes: Vec::new(),
            functions: Vec::new(),
            imports: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            blocks: BTreeMap::new(),
        }
    }

    pub fn masked(&self) -> &'a str {
        self.src.masked.as_str()
    }

    pub fn line(&self, pos: usize) -> usize {
        self.src.line_of(pos)
    }

    pub fn docstring(&self, pos: usize, skip_prefixes: &[&str]) -> String {
        find_docstring(self.src.original_lines(), self.line(pos), skip_prefixes)
    }

    /// Normalized stripped text in `start..end` (literals kept, comments gone).
    pub fn stripped_text(&self, start: usize, end: usize) -> Result<String, ExtractError> {
        Ok(crate::scan::params::normalize_space(
            self.src.stripped_slice(start, end)?,
        ))
    }

    /// Block opened by the nearest unmatched `{` before `pos`.
    pub fn enclosing_block(&self, pos: usize) -> Option<(usize, Option<&Block>)> {
        self.src.braces.enclosing_open(pos).map(|open| (open, self.blocks.get(&open)))
    }

    /// Index of the class whose body directly contains `pos`.
    pub fn class_at(&self, pos: usize) -> Option<usize> {
        match self.enclosing_block(pos) {
            Some((_, Some(Block::Class(idx)))) => Some(*idx),
            _ => None,
        }
    }

    /// Whether `pos` falls inside any recognized class range.
    pub fn in_any_class(&self, pos: usize) -> bool {
        self.classes.iter().any(|c| c.open <= pos && pos <= c.close)
    }

    /// Outside every class, and directly in the file, a namespace, or an
    /// `extern "C"` block.
    pub fn at_top_level(&self, pos: usize) -> bool {
        if self.in_any_class(pos) {
            return false;
        }
        matches!(
            self.enclosing_block(pos),
            None | Some((_, Some(Block::Namespace(_)))) | Some((_, Some(Block::Extern)))
        )
    }

    /// Enclosing named namespaces joined with `::`, or the package.
    pub fn namespace_at(&self, pos: usize) -> Option<String> {
        let mut names: Vec<&str> = self.src.braces.enclosing_chain(pos)
            .iter()
            .filter_map(|open| match self.blocks.get(open) {
                Some(Block::Namespace(Some(name))) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        if names.is_empty() {
            return self.package.clone();
        }
        names.reverse();
        Some(names.join("::"))
    }

    /// Whether any enclosing namespace is anonymous.
    pub fn in_anonymous_namespace(&self, pos: usize) -> bool {
        self.src.braces.enclosing_chain(pos)
            .iter()
            .any(|open| matches!(self.blocks.get(open), Some(Block::Namespace(None))))
    }

    /// Locate the body opened at `open` and score it.
    pub fn body(&self, open: usize) -> Result<Body, ExtractError> {
        let m = match_delimiter(self.masked(), open);
        let text = self.src.masked_slice(open, (m.close + 1).min(self.masked().len()))?;
        Ok(Body {
            close: m.close,
            terminated: m.terminated,
            end_line: self.line(m.close),
            complexity: complexity::score(text),
            dependencies: self.deps.collect(text),
        })
    }

    pub fn add_class(&mut self, draft: ClassDraft) -> usize {
        let idx = self.classes.len();
        self.blocks.insert(draft.open, Block::Class(idx));
        self.trace("class", &draft.info.name, draft.info.start_line);
        self.classes.push(draft);
        idx
    }

    pub fn add_method(&mut self, class: usize, method: FunctionInfo) {
        self.trace("method", &method.name, method.start_line);
        if let Some(draft) = self.classes.get_mut(class) {
            draft.info.methods.push(method);
        }
    }

    pub fn add_function(&mut self, function: FunctionInfo) {
        self.trace("function", &function.name, function.start_line);
        self.functions.push(function);
    }

    /// Warn when a body runs to end of input.
    pub fn check_terminated(&mut self, body: &Body, name: &str, pos: usize) {
        if !body.terminated {
            self.warnings.push(
                Diagnostic::warning(
                    format!("block of '{}' is not closed before end of input", name),
                    self.line(pos),
                    self.src.column_of(pos),
                )
                .with_code(UNTERMINATED_BLOCK),
            );
        }
    }

    pub fn trace(&self, kind: &str, name: &str, line: usize) {
        if self.options.verbose {
            tracing::debug!(language = self.language, kind, name, line, "recognized declaration");
        }
    }

    /// Assemble the summary. Members and functions come out in source order;
    /// exports are the exported top-level classes and functions.
    pub fn finish(self) -> StructuralSummary {
        let mut exports = Vec::new();
        let mut classes = Vec::with_capacity(self.classes.len());
        for draft in self.classes {
            let mut info = draft.info;
            info.methods.sort_by_key(|m| m.start_line);
            info.properties.sort_by_key(|p| p.line);
            if info.is_exported && !draft.nested {
                exports.push(ExportInfo {
                    name: info.name.clone(),
                    kind: ExportKind::Class,
                    line: info.start_line,
                });
            }
            classes.push(info);
        }

        let mut functions = self.functions;
        functions.sort_by_key(|f| f.start_line);
        exports.extend(functions.iter().filter(|f| f.is_exported).map(|f| ExportInfo {
            name: f.qualified_name(),
            kind: ExportKind::Function,
            line: f.start_line,
        }));
        exports.sort_by_key(|e| e.line);

        let mut errors = self.errors;
        errors.sort_by_key(|d| (d.line, d.column));
        let mut warnings = self.warnings;
        warnings.sort_by_key(|d| (d.line, d.column));

        StructuralSummary {
            language: self.language.to_string(),
            package: self.package,
            functions,
            classes,
            imports: self.imports,
            exports,
            syntax_errors: errors,
            warnings,
        }
    }
}

/// Whether a declaration may start at `pos` in masked text: the previous
/// non-space byte ends a statement or block, or is the `:` of an access label
/// when `labels` is set.
pub fn at_statement_start(masked: &str, pos: usize, labels: bool) -> bool {
    let before = masked[..pos.min(masked.len())].trim_end();
    match before.as_bytes().last() {
        None | Some(b'{') | Some(b'}') | Some(b';') => true,
        Some(b':') if labels => {
            let word = before[..before.len() - 1].trim_end();
            ["public", "protected", "private"]
                .iter()
                .any(|label| word.ends_with(label))
        }
        _ => false,
    }
}

/// Offset of the first `{` after `from`, or `None` when a `;` or `}` comes
/// first. `(...)` and `<...>` groups are skipped.
pub fn find_body_open(masked: &str, from: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => return Some(i),
            b';' | b'}' => return None,
            b'(' => {
                let m = match_delimiter(masked, i);
                if !m.terminated {
                    return None;
                }
                i = m.close;
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Offset of the first top-level `;` at or after `from`, stopping at a
/// closing `}` of the enclosing block.
pub fn statement_end(masked: &str, from: usize) -> usize {
    let bytes = masked.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b';' | b'}' => return i,
            b'(' | b'{' | b'[' => {
                let m = match_delimiter(masked, i);
                if !m.terminated {
                    return bytes.len();
                }
                i = m.close;
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}
