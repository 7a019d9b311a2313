//! Structural summary types produced by one `parse` call.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A syntax hint or extraction failure, positioned at a 1-based line/column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub severity: Severity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            severity: Severity::Error,
            code: None,
        }
    }

    pub fn warning(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            severity: Severity::Warning,
            code: None,
        }
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }
}

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    /// Java package-private (no modifier).
    Package,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
            Visibility::Package => "package",
        }
    }
}

/// A function or method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// A function, method, or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    pub parameters: Vec<ParameterInfo>,
    /// `None` for constructors and destructors.
    pub return_type: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub complexity: u32,
    pub dependencies: BTreeSet<String>,
    pub is_exported: bool,
    pub is_static: bool,
    pub is_constructor: bool,
    /// Declared without a body (abstract, interface, prototype).
    pub is_abstract: bool,
    pub docstring: String,
    pub test_candidates: Vec<String>,
    /// Owning type of an out-of-class definition (`Foo` in `Foo::bar`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl FunctionInfo {
    /// `receiver::name` for out-of-class definitions, otherwise `name`.
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{}::{}", recv, self.name),
            None => self.name.clone(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }
}

/// A field or enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub r#type: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Kind of class-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    Struct,
    Union,
}

impl ClassKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Class => "class",
            ClassKind::Interface => "interface",
            ClassKind::Enum => "enum",
            ClassKind::Record => "record",
            ClassKind::Struct => "struct",
            ClassKind::Union => "union",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A class, interface, enum, record, struct or union.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    pub kind: ClassKind,
    pub methods: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub is_exported: bool,
    pub is_abstract: bool,
    pub docstring: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl ClassInfo {
    pub fn find_method(&self, name: &str) -> Option<&FunctionInfo> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// One imported name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSpecifier {
    pub name: String,
    pub alias: Option<String>,
    pub is_default: bool,
}

/// An import or include directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportInfo {
    pub source: String,
    pub imports: Vec<ImportSpecifier>,
    pub is_external: bool,
    pub is_static: bool,
    pub line: usize,
}

/// Kind of exported declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Class,
    Function,
}

/// A publicly visible top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportInfo {
    pub name: String,
    pub kind: ExportKind,
    pub line: usize,
}

/// Everything extracted from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuralSummary {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    pub exports: Vec<ExportInfo>,
    pub syntax_errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Code attached to the single diagnostic of a failed extraction.
pub const PARSE_ERROR: &str = "PARSE_ERROR";

impl StructuralSummary {
    pub fn empty(language: &str) -> Self {
        Self {
            language: language.to_string(),
            package: None,
            functions: Vec::new(),
            classes: Vec::new(),
            imports: Vec::new(),
            exports: Vec::new(),
            syntax_errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Summary returned when extraction itself failed.
    pub fn parse_failure(language: &str, message: impl Into<String>) -> Self {
        let mut summary = Self::empty(language);
        summary
            .syntax_errors
            .push(Diagnostic::error(message, 1, 1).with_code(PARSE_ERROR));
        summary
    }

    /// True when this summary is the result of a failed extraction.
    pub fn is_parse_failure(&self) -> bool {
        self.syntax_errors
            .iter()
            .any(|d| d.code.as_deref() == Some(PARSE_ERROR))
    }

    /// Top-level functions followed by every class method.
    pub fn all_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions
            .iter()
            .chain(self.classes.iter().flat_map(|c| c.methods.iter()))
    }

    pub fn find_function(&self, name: &str) -> Option<&FunctionInfo> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassInfo> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// Sum of complexity over all functions and methods.
    pub fn total_complexity(&self) -> u32 {
        self.all_functions().map(|f| f.complexity).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.syntax_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn function(name: &str, complexity: u32) -> FunctionInfo {
        FunctionInfo {
            name: name.to_string(),
            parameters: Vec::new(),
            return_type: Some("void".to_string()),
            start_line: 1,
            end_line: 3,
            complexity,
            dependencies: BTreeSet::new(),
            is_exported: true,
            is_static: false,
            is_constructor: false,
            is_abstract: false,
            docstring: String::new(),
            test_candidates: Vec::new(),
            receiver: None,
            namespace: None,
        }
    }

    #[test]
    fn test_parse_failure_shape() {
        let summary = StructuralSummary::parse_failure("java", "boom");
        assert!(summary.functions.is_empty());
        assert!(summary.classes.is_empty());
        assert_eq!(summary.syntax_errors.len(), 1);
        let diag = &summary.syntax_errors[0];
        assert_eq!((diag.line, diag.column), (1, 1));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.as_deref(), Some(PARSE_ERROR));
        assert!(summary.is_parse_failure());
    }

    #[test]
    fn test_total_complexity_includes_methods() {
        let mut summary = StructuralSummary::empty("cpp");
        summary.functions.push(function("free", 2));
        summary.classes.push(ClassInfo {
            name: "Widget".to_string(),
            kind: ClassKind::Class,
            methods: vec![function("draw", 4)],
            properties: Vec::new(),
            extends: None,
            implements: Vec::new(),
            start_line: 5,
            end_line: 10,
            is_exported: true,
            is_abstract: false,
            docstring: String::new(),
            namespace: None,
        });
        assert_eq!(summary.total_complexity(), 6);
        assert_eq!(summary.all_functions().count(), 2);
        assert!(summary.find_class("Widget").unwrap().find_method("draw").is_some());
    }

    #[test]
    fn test_qualified_name() {
        let mut f = function("draw", 1);
        assert_eq!(f.qualified_name(), "draw");
        f.receiver = Some("Widget".to_string());
        assert_eq!(f.qualified_name(), "Widget::draw");
        assert_eq!(f.line_count(), 3);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(function("run", 1)).unwrap();
        assert!(json.get("startLine").is_some());
        assert!(json.get("isExported").is_some());
        assert!(json.get("testCandidates").is_some());
        assert!(json.get("receiver").is_none());
    }
}
