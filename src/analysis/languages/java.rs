//! Java structural extractor.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::rules::{
    at_statement_start, find_body_open, run_rules, statement_end, ClassDraft, Rule, Scan, View,
};
use crate::analysis::{
    ClassInfo, ClassKind, ExtractError, FunctionInfo, ImportInfo, ImportSpecifier,
    LanguageExtractor, PropertyInfo, StructuralSummary, Visibility,
};
use crate::config::ExtractOptions;
use crate::scan::params::{split_default, split_top_level};
use crate::scan::{
    check_lines, match_delimiter, parse_parameter_list, skip_whitespace, test_candidates,
    CandidateStyle, DependencyCollector, DependencyRules, LineRules, MaskRules, ParamSyntax,
    SourceText,
};

const ANNOTATIONS: &str = r"(?:@[\w.]+(?:\s*\([^)]*\))?\s*)*";

const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch", "finally",
    "return", "new", "throw", "throws", "super", "this", "synchronized", "assert", "yield",
    "package", "import", "break", "continue", "goto", "instanceof", "var",
];

/// First segments of platform packages.
const PLATFORM_PACKAGES: &[&str] = &[
    "java", "javax", "jakarta", "jdk", "sun", "com.sun", "org.w3c", "org.xml", "org.ietf",
    "org.omg",
];

const PARAMS: ParamSyntax = ParamSyntax {
    modifiers: &["final"],
    type_words: &["int", "long", "boolean", "double", "float", "char", "byte", "short"],
    annotations: true,
    defaults: false,
};

const DEPENDENCIES: DependencyRules = DependencyRules {
    field_access: &[("this", ".")],
    scoped_calls: false,
    ignored: &[
        "if", "for", "while", "switch", "catch", "synchronized", "return", "new", "super",
        "this", "throw", "assert", "int", "long", "boolean", "double", "float", "char", "byte",
        "short", "void", "null", "true", "false",
    ],
};

const LINE_RULES: LineRules = LineRules {
    block_keywords: &[
        "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch",
        "finally", "class", "interface", "enum", "record", "package", "import", "static",
        "synchronized",
    ],
    skip_prefixes: &["@", "*"],
    macro_lines: false,
};

lazy_static! {
    static ref PACKAGE: Regex = Regex::new(r"\bpackage\s+([\w$.]+)\s*;").unwrap();
    static ref IMPORT: Regex =
        Regex::new(r"(?m)^[ \t]*import\s+(static\s+)?([\w$.]+?)(\.\*)?\s*;").unwrap();
    static ref TYPE_DECL: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?P<mods>(?:(?:public|protected|private|static|final|abstract|sealed|non-sealed|strictfp)\s+)*)(?P<kind>class|interface|enum|record|@interface)\s+(?P<name>[A-Za-z_$][\w$]*))",
        ANNOTATIONS
    ))
    .unwrap();
    static ref METHOD: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?P<mods>(?:(?:public|protected|private|static|final|abstract|synchronized|native|default|strictfp)\s+)*)(?:<[^;{{}}()]*?>\s*)?(?:(?P<ret>[\w$.]+(?:\s*<[^;{{}}()]*?>)?(?:\s*\[\s*\])*)\s+)?(?P<name>[A-Za-z_$][\w$]*))\s*\(",
        ANNOTATIONS
    ))
    .unwrap();
    static ref FIELD: Regex = Regex::new(&format!(
        r"{}(?P<decl>(?P<mods>(?:(?:public|protected|private|static|final|transient|volatile)\s+)*)(?P<type>[\w$.]+(?:\s*<[^;{{}}()]*?>)?(?:\s*\[\s*\])*)\s+(?P<name>[A-Za-z_$][\w$]*))\s*(?:\[\s*\]\s*)*[=;,]",
        ANNOTATIONS
    ))
    .unwrap();
    static ref CLAUSE: Regex = Regex::new(r"\b(extends|implements|permits)\b").unwrap();
    static ref LEADING_IDENT: Regex =
        Regex::new(&format!(r"^\s*{}([A-Za-z_$][\w$]*)", ANNOTATIONS)).unwrap();
    static ref DEPS: DependencyCollector = DependencyCollector::new(&DEPENDENCIES).unwrap();
    static ref RULES: Vec<Rule> = vec![
        Rule { name: "package", view: View::Masked, pattern: &*PACKAGE, apply: package_decl },
        Rule { name: "import", view: View::Original, pattern: &*IMPORT, apply: import_decl },
        Rule { name: "type", view: View::Masked, pattern: &*TYPE_DECL, apply: type_decl },
        Rule { name: "method", view: View::Masked, pattern: &*METHOD, apply: method_decl },
        Rule { name: "field", view: View::Masked, pattern: &*FIELD, apply: field_decl },
    ];
}

/// Java extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaExtractor;

impl JavaExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageExtractor for JavaExtractor {
    fn language_id(&self) -> &'static str {
        "java"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["java"]
    }

    fn extract(
        &self,
        source: &str,
        options: &ExtractOptions,
    ) -> Result<StructuralSummary, ExtractError> {
        let src = SourceText::new(source, &MaskRules::JAVA)?;
        let mut scan = Scan::new(&src, options, self.language_id(), &DEPS);
        run_rules(&RULES, &mut scan)?;

        let hints = check_lines(&src.masked, &LINE_RULES);
        scan.errors.extend(hints.errors);
        scan.warnings.extend(hints.warnings);
        Ok(scan.finish())
    }
}

/// External when the path is a platform package or has a single segment.
pub fn is_external_import(path: &str) -> bool {
    if !path.contains('.') {
        return true;
    }
    PLATFORM_PACKAGES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

fn modifiers<'t>(caps: &Captures<'t>) -> Vec<&'t str> {
    caps.name("mods")
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default()
}

fn visibility_from(mods: &[&str]) -> Option<Visibility> {
    if mods.contains(&"public") {
        Some(Visibility::Public)
    } else if mods.contains(&"protected") {
        Some(Visibility::Protected)
    } else if mods.contains(&"private") {
        Some(Visibility::Private)
    } else {
        None
    }
}

fn package_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let start = caps.get(0).map_or(0, |m| m.start());
    if scan.package.is_none() && at_statement_start(scan.masked(), start, false) {
        scan.package = Some(caps[1].to_string());
        scan.trace("package", &caps[1], scan.line(start));
    }
    Ok(())
}

fn import_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let start = caps.get(0).map_or(0, |m| m.start());
    // Commented-out imports are blank in the masked view.
    if !scan.masked()[start..].trim_start().starts_with("import") {
        return Ok(());
    }
    let path = caps[2].to_string();
    let wildcard = caps.get(3).is_some();
    let name = if wildcard {
        "*".to_string()
    } else {
        path.rsplit('.').next().unwrap_or(&path).to_string()
    };
    scan.imports.push(ImportInfo {
        is_external: is_external_import(&path),
        source: path,
        imports: vec![ImportSpecifier {
            name,
            alias: None,
            is_default: false,
        }],
        is_static: caps.get(1).is_some(),
        line: scan.line(start),
    });
    Ok(())
}

fn type_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let (Some(whole), Some(decl), Some(name)) = (caps.get(0), caps.name("decl"), caps.name("name"))
    else {
        return Ok(());
    };
    let masked = scan.masked();
    if !at_statement_start(masked, whole.start(), false) {
        return Ok(());
    }
    let Some(open) = find_body_open(masked, name.end()) else {
        return Ok(());
    };

    let kind = match &caps["kind"] {
        "interface" | "@interface" => ClassKind::Interface,
        "enum" => ClassKind::Enum,
        "record" => ClassKind::Record,
        _ => ClassKind::Class,
    };
    let mods = modifiers(caps);

    // Header: optional type parameters, record components, then clauses.
    let mut cursor = skip_whitespace(masked, name.end());
    if masked.as_bytes().get(cursor) == Some(&b'<') {
        cursor = skip_whitespace(masked, match_delimiter(masked, cursor).close + 1);
    }
    let mut components = None;
    if kind == ClassKind::Record && masked.as_bytes().get(cursor) == Some(&b'(') {
        let close = match_delimiter(masked, cursor).close;
        components = Some((cursor + 1, close));
        cursor = close + 1;
    }
    let header = scan.src.masked_slice(cursor.min(open), open)?;
    let (mut extends, mut implements) = (None, Vec::new());
    for (keyword, list) in clauses(header) {
        match (keyword, kind) {
            ("extends", ClassKind::Interface) | ("implements", _) => implements.extend(list),
            ("extends", _) => extends = list.into_iter().next(),
            _ => {}
        }
    }

    let parent = scan.class_at(whole.start());
    let in_interface = parent
        .and_then(|idx| scan.classes.get(idx))
        .is_some_and(|c| c.info.kind == ClassKind::Interface);
    let body = scan.body(open)?;
    let info = ClassInfo {
        name: name.as_str().to_string(),
        kind,
        methods: Vec::new(),
        properties: Vec::new(),
        extends,
        implements,
        start_line: scan.line(decl.start()),
        end_line: body.end_line,
        is_exported: mods.contains(&"public") || (in_interface && !mods.contains(&"private")),
        is_abstract: mods.contains(&"abstract") || kind == ClassKind::Interface,
        docstring: scan.docstring(decl.start(), &["@"]),
        namespace: scan.package.clone(),
    };
    let default_visibility = if kind == ClassKind::Interface {
        Visibility::Public
    } else {
        Visibility::Package
    };
    let idx = scan.add_class(ClassDraft {
        info,
        open,
        close: body.close,
        nested: scan.in_any_class(whole.start()),
        default_visibility,
        access_labels: Vec::new(),
    });
    scan.check_terminated(&body, name.as_str(), decl.start());

    if let Some((start, end)) = components {
        record_components(scan, idx, start, end)?;
    }
    if kind == ClassKind::Enum {
        enum_constants(scan, idx, open)?;
    }
    Ok(())
}

/// `extends A, B implements C` → `[("extends", [A, B]), ("implements", [C])]`.
fn clauses(header: &str) -> Vec<(&'static str, Vec<String>)> {
    let found: Vec<(usize, usize, &'static str)> = CLAUSE
        .captures_iter(header)
        .filter_map(|c| {
            let m = c.get(1)?;
            let keyword = match m.as_str() {
                "extends" => "extends",
                "implements" => "implements",
                _ => "permits",
            };
            Some((m.start(), m.end(), keyword))
        })
        .collect();

    found
        .iter()
        .enumerate()
        .map(|(i, &(_, end, keyword))| {
            let stop = found.get(i + 1).map_or(header.len(), |next| next.0);
            let list = split_top_level(&header[end..stop], ',')
                .into_iter()
                .map(crate::scan::params::normalize_space)
                .filter(|s| !s.is_empty())
                .collect();
            (keyword, list)
        })
        .collect()
}

fn record_components(
    scan: &mut Scan<'_>,
    class: usize,
    start: usize,
    end: usize,
) -> Result<(), ExtractError> {
    let text = scan.src.stripped_slice(start, end)?;
    let line = scan.line(start);
    let properties: Vec<PropertyInfo> = parse_parameter_list(text, &PARAMS)
        .into_iter()
        .filter(|p| !p.name.is_empty())
        .map(|p| PropertyInfo {
            name: p.name,
            r#type: p.r#type,
            visibility: Visibility::Private,
            is_static: false,
            line,
            default_value: None,
        })
        .collect();
    if let Some(draft) = scan.classes.get_mut(class) {
        draft.info.properties.extend(properties);
    }
    Ok(())
}

fn enum_constants(scan: &mut Scan<'_>, class: usize, open: usize) -> Result<(), ExtractError> {
    let masked = scan.masked();
    let end = statement_end(masked, open + 1);
    let list = scan.src.masked_slice(open + 1, end)?;
    let Some(enum_name) = scan.classes.get(class).map(|c| c.info.name.clone()) else {
        return Ok(());
    };

    let mut offset = open + 1;
    let mut constants = Vec::new();
    for piece in split_top_level(list, ',') {
        if let Some(m) = LEADING_IDENT.captures(piece).and_then(|c| c.get(1)) {
            constants.push(PropertyInfo {
                name: m.as_str().to_string(),
                r#type: enum_name.clone(),
                visibility: Visibility::Public,
                is_static: true,
                line: scan.line(offset + m.start()),
                default_value: None,
            });
        }
        offset += piece.len() + 1;
    }
    if let Some(draft) = scan.classes.get_mut(class) {
        draft.info.properties.extend(constants);
    }
    Ok(())
}

enum Trailer {
    Body(usize),
    Declaration(usize),
}

/// What follows a parameter list: `throws ...`, then a body or `;`.
fn trailer(masked: &str, after: usize) -> Option<Trailer> {
    let mut i = skip_whitespace(masked, after);
    let rest = &masked[i..];
    if rest.starts_with("throws") || rest.starts_with("default") {
        i += rest.find(['{', ';'])?;
    }
    match masked.as_bytes().get(i) {
        Some(b'{') => Some(Trailer::Body(i)),
        Some(b';') => Some(Trailer::Declaration(i)),
        _ => None,
    }
}

fn method_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let (Some(whole), Some(decl), Some(name)) = (caps.get(0), caps.name("decl"), caps.name("name"))
    else {
        return Ok(());
    };
    let masked = scan.masked();
    if KEYWORDS.contains(&name.as_str()) || !at_statement_start(masked, whole.start(), false) {
        return Ok(());
    }
    if caps
        .name("ret")
        .is_some_and(|r| KEYWORDS.contains(&r.as_str()))
    {
        return Ok(());
    }

    let paren = whole.end() - 1;
    let params_end = match_delimiter(masked, paren);
    if !params_end.terminated {
        return Ok(());
    }
    let Some(trailer) = trailer(masked, params_end.close + 1) else {
        return Ok(());
    };

    let class = scan.class_at(whole.start());
    let class_name = class
        .and_then(|idx| scan.classes.get(idx))
        .map(|c| c.info.name.clone());
    let is_constructor = caps.name("ret").is_none();
    if is_constructor && class_name.as_deref() != Some(name.as_str()) {
        return Ok(());
    }
    let has_body = matches!(trailer, Trailer::Body(_));
    if class.is_none() && (!has_body || !scan.at_top_level(whole.start())) {
        return Ok(());
    }

    let mods = modifiers(caps);
    let return_type = match caps.name("ret") {
        Some(r) => Some(scan.stripped_text(r.start(), r.end())?),
        None => None,
    };
    let parameters =
        parse_parameter_list(scan.src.stripped_slice(paren + 1, params_end.close)?, &PARAMS);

    let (end_line, complexity, dependencies) = match trailer {
        Trailer::Body(open) => {
            let body = scan.body(open)?;
            scan.check_terminated(&body, name.as_str(), decl.start());
            (body.end_line, body.complexity, body.dependencies)
        }
        Trailer::Declaration(semi) => (scan.line(semi), 1, Default::default()),
    };

    let visibility = match class.and_then(|idx| scan.classes.get(idx)) {
        Some(draft) => visibility_from(&mods).unwrap_or(draft.default_visibility),
        None => visibility_from(&mods).unwrap_or(Visibility::Package),
    };

    let function = FunctionInfo {
        name: name.as_str().to_string(),
        test_candidates: test_candidates(name.as_str(), parameters.len(), CandidateStyle::Camel),
        parameters,
        return_type,
        start_line: scan.line(decl.start()),
        end_line,
        complexity,
        dependencies,
        is_exported: visibility == Visibility::Public,
        is_static: mods.contains(&"static"),
        is_constructor,
        is_abstract: !has_body,
        docstring: scan.docstring(decl.start(), &["@"]),
        receiver: None,
        namespace: scan.namespace_at(whole.start()),
    };
    match class {
        Some(idx) => scan.add_method(idx, function),
        None => scan.add_function(function),
    }
    Ok(())
}

fn field_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let (Some(whole), Some(ty), Some(name)) = (caps.get(0), caps.name("type"), caps.name("name"))
    else {
        return Ok(());
    };
    let masked = scan.masked();
    if KEYWORDS.contains(&ty.as_str()) || !at_statement_start(masked, whole.start(), false) {
        return Ok(());
    }
    let Some(class) = scan.class_at(whole.start()) else {
        return Ok(());
    };

    let mods = modifiers(caps);
    let r#type = scan.stripped_text(ty.start(), ty.end())?;
    let visibility = scan
        .classes
        .get(class)
        .map(|c| visibility_from(&mods).unwrap_or(c.default_visibility))
        .unwrap_or(Visibility::Package);
    let is_static = mods.contains(&"static")
        || scan
            .classes
            .get(class)
            .is_some_and(|c| c.info.kind == ClassKind::Interface);

    let end = statement_end(masked, name.start());
    let declarators = scan.src.masked_slice(name.start(), end)?;
    let mut offset = name.start();
    let mut properties = Vec::new();
    for piece in split_top_level(declarators, ',') {
        let stripped = scan.src.stripped_slice(offset, offset + piece.len())?;
        let (decl, default) = split_default(stripped);
        if let Some(m) = LEADING_IDENT.captures(decl).and_then(|c| c.get(1)) {
            properties.push(PropertyInfo {
                name: m.as_str().to_string(),
                r#type: r#type.clone(),
                visibility,
                is_static,
                line: scan.line(offset),
                default_value: default.map(crate::scan::params::normalize_space),
            });
        }
        offset += piece.len() + 1;
    }

    for property in &properties {
        scan.trace("field", &property.name, property.line);
    }
    if let Some(draft) = scan.classes.get_mut(class) {
        draft.info.properties.extend(properties);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> StructuralSummary {
        JavaExtractor::new().parse(source, &ExtractOptions::default())
    }

    #[test]
    fn test_top_level_snippet_function() {
        let summary = parse("public int add(int a, int b) { return a + b; }");
        assert_eq!(summary.functions.len(), 1);
        let add = &summary.functions[0];
        assert_eq!(add.name, "add");
        assert_eq!(add.return_type.as_deref(), Some("int"));
        assert_eq!(add.parameters.len(), 2);
        assert_eq!(add.parameters[0].name, "a");
        assert_eq!(add.parameters[0].r#type, "int");
        assert!(add.is_exported);
        assert_eq!(add.complexity, 1);
        assert_eq!(add.test_candidates[0], "testAddSuccess");
    }

    #[test]
    fn test_class_members() {
        let source = r#"package com.example.shop;

import java.util.List;
import com.example.shop.model.*;

/**
 * A shopping cart.
 */
public class Cart extends Base implements Serializable, Comparable<Cart> {
    private static final int LIMIT = 10, SOFT = 5;
    protected List<String> items = new ArrayList<>();

    public Cart(int size) {
        this.size = size;
    }

    /** Adds an item. */
    @Override
    public boolean add(String item) throws IllegalStateException {
        if (item == null || items.size() > LIMIT) {
            return false;
        }
        return items.add(item);
    }

    static int count() { return 0; }
}
"#;
        let summary = parse(source);
        assert_eq!(summary.package.as_deref(), Some("com.example.shop"));
        assert_eq!(summary.imports.len(), 2);
        assert!(summary.imports[0].is_external);
        assert!(!summary.imports[1].is_external);
        assert_eq!(summary.imports[1].imports[0].name, "*");
        assert!(summary.functions.is_empty());

        let cart = summary.find_class("Cart").unwrap();
        assert_eq!(cart.extends.as_deref(), Some("Base"));
        assert_eq!(cart.implements, vec!["Serializable", "Comparable<Cart>"]);
        assert_eq!(cart.docstring, "A shopping cart.");
        assert!(cart.is_exported);
        assert_eq!(cart.start_line, 9);
        assert_eq!(cart.end_line, 27);

        let names: Vec<&str> = cart.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Cart", "add", "count"]);
        assert!(cart.methods[0].is_constructor);
        assert_eq!(cart.methods[0].return_type, None);
        assert!(cart.methods[0].dependencies.contains("size"));

        let add = cart.find_method("add").unwrap();
        assert_eq!(add.docstring, "Adds an item.");
        assert_eq!(add.complexity, 3);
        assert_eq!(add.start_line, 19);
        assert!(add.is_exported);

        let count = cart.find_method("count").unwrap();
        assert!(count.is_static);
        assert!(!count.is_exported);

        let props: Vec<&str> = cart.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(props, vec!["LIMIT", "SOFT", "items"]);
        assert_eq!(cart.properties[0].default_value.as_deref(), Some("10"));
        assert!(cart.properties[0].is_static);
        assert_eq!(cart.properties[2].visibility, Visibility::Protected);

        assert_eq!(summary.exports.len(), 1);
        assert_eq!(summary.exports[0].name, "Cart");
    }

    #[test]
    fn test_interface_and_enum() {
        let source = r#"
public interface Shape extends Comparable<Shape>, Named {
    double area();
    default String label() { return "shape"; }
}

enum Color implements Coded {
    RED("r"), GREEN("g"), BLUE("b");
    private final String code;
    Color(String code) { this.code = code; }
}
"#;
        let summary = parse(source);
        let shape = summary.find_class("Shape").unwrap();
        assert_eq!(shape.kind, ClassKind::Interface);
        assert_eq!(shape.extends, None);
        assert_eq!(shape.implements, vec!["Comparable<Shape>", "Named"]);
        let area = shape.find_method("area").unwrap();
        assert!(area.is_abstract);
        assert!(area.is_exported);
        assert!(!shape.find_method("label").unwrap().is_abstract);

        let color = summary.find_class("Color").unwrap();
        assert_eq!(color.kind, ClassKind::Enum);
        let props: Vec<&str> = color.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(props, vec!["RED", "GREEN", "BLUE", "code"]);
        assert!(color.find_method("Color").unwrap().is_constructor);
        assert!(!color.is_exported);
    }

    #[test]
    fn test_record_and_generic_method() {
        let source = r#"
public record Point(int x, int y) implements Cloneable {
    public static <T extends Number> List<T> scale(List<T> values, double factor) {
        return values.stream().map(v -> factor > 1 ? v : v).collect(toList());
    }
}
"#;
        let summary = parse(source);
        let point = summary.find_class("Point").unwrap();
        assert_eq!(point.kind, ClassKind::Record);
        assert_eq!(point.implements, vec!["Cloneable"]);
        assert_eq!(point.properties.len(), 2);
        let scale = point.find_method("scale").unwrap();
        assert_eq!(scale.return_type.as_deref(), Some("List<T>"));
        assert_eq!(scale.parameters[0].r#type, "List<T>");
        assert_eq!(scale.complexity, 2);
        assert!(scale.dependencies.contains("collect"));
    }

    #[test]
    fn test_nested_and_local_classes() {
        let source = r#"
public class Outer {
    public static class Inner {
        void run() {
            Runnable r = new Runnable() {
                public void run() { helper(); }
            };
        }
    }
    void outerMethod() {}
}
"#;
        let summary = parse(source);
        let inner = summary.find_class("Inner").unwrap();
        assert_eq!(inner.methods.len(), 1);
        let outer = summary.find_class("Outer").unwrap();
        assert_eq!(outer.methods.len(), 1);
        assert_eq!(outer.methods[0].name, "outerMethod");
        assert!(summary.functions.is_empty());
        assert_eq!(summary.exports.len(), 1);
    }

    #[test]
    fn test_braces_in_literals_and_comments_are_ignored() {
        let source = r#"
class Text {
    String open = "{{{";
    // } stray brace in a comment
    char close = '}';
    String block = """
        }
        """;
    void after() {}
}
"#;
        let summary = parse(source);
        let text = summary.find_class("Text").unwrap();
        assert_eq!(text.end_line, 10);
        assert_eq!(text.methods.len(), 1);
        assert_eq!(text.properties[0].default_value.as_deref(), Some("\"{{{\""));
    }

    #[test]
    fn test_truncated_class() {
        let summary = parse("class Foo { void bar() {");
        let foo = summary.find_class("Foo").unwrap();
        assert_eq!(foo.methods.len(), 1);
        assert!(foo.start_line <= foo.end_line);
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.code.as_deref() == Some(crate::analysis::UNTERMINATED_BLOCK)));
    }

    #[test]
    fn test_import_classification() {
        assert!(is_external_import("java.util.List"));
        assert!(is_external_import("javax.inject.Inject"));
        assert!(is_external_import("com.sun.net.httpserver.HttpServer"));
        assert!(is_external_import("lombok"));
        assert!(!is_external_import("com.example.Foo"));
        assert!(!is_external_import("javafx.scene.Node"));
        assert!(!is_external_import("org.junit.Test"));
    }

    #[test]
    fn test_static_import() {
        let summary = parse("import static org.junit.Assert.assertEquals;\n");
        let import = &summary.imports[0];
        assert!(import.is_static);
        assert_eq!(import.source, "org.junit.Assert.assertEquals");
        assert_eq!(import.imports[0].name, "assertEquals");
        assert_eq!(import.line, 1);
    }
}
