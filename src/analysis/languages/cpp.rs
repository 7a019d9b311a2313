//! C++ structural extractor.
//!
//! Preprocessor lines are blanked before recognition, so macro bodies and
//! conditional blocks never produce declarations. `#include` directives are
//! read from the original text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::rules::{
    at_statement_start, find_body_open, run_rules, statement_end, Block, ClassDraft, Rule, Scan,
    View,
};
use crate::analysis::{
    ClassInfo, ClassKind, ExtractError, FunctionInfo, ImportInfo, ImportSpecifier,
    LanguageExtractor, PropertyInfo, StructuralSummary, Visibility,
};
use crate::config::ExtractOptions;
use crate::scan::params::{normalize_space, split_default, split_top_level};
use crate::scan::{
    check_lines, match_delimiter, parse_parameter_list, skip_whitespace, test_candidates,
    CandidateStyle, DependencyCollector, DependencyRules, LineRules, MaskRules, ParamSyntax,
    SourceText,
};

/// Words that are never function names.
const KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch", "return",
    "sizeof", "alignof", "alignas", "decltype", "static_assert", "new", "delete", "throw",
    "typeid", "noexcept", "defined", "using", "typedef", "namespace", "template", "goto",
    "co_return", "co_await", "co_yield", "requires", "static_cast", "dynamic_cast",
    "reinterpret_cast", "const_cast", "public", "private", "protected",
];

/// Words that cannot start a return or field type.
const NON_TYPES: &[&str] = &[
    "return", "else", "new", "delete", "throw", "case", "goto", "co_return", "co_await",
    "co_yield", "using", "typedef", "namespace", "template", "public", "private", "protected",
    "friend", "class", "struct", "union", "enum", "operator",
];

const PARAMS: ParamSyntax = ParamSyntax {
    modifiers: &["register"],
    type_words: &[
        "int", "long", "short", "char", "bool", "float", "double", "void", "unsigned", "signed",
        "const", "volatile", "auto", "size_t", "wchar_t",
    ],
    annotations: false,
    defaults: true,
};

const DEPENDENCIES: DependencyRules = DependencyRules {
    field_access: &[("this", "->")],
    scoped_calls: true,
    ignored: &[
        "if", "for", "while", "switch", "catch", "return", "sizeof", "alignof", "decltype",
        "static_assert", "new", "delete", "throw", "typeid", "noexcept", "static_cast",
        "dynamic_cast", "reinterpret_cast", "const_cast", "this", "std", "int", "long", "short",
        "char", "bool", "float", "double", "void", "unsigned", "signed", "auto",
    ],
};

const LINE_RULES: LineRules = LineRules {
    block_keywords: &[
        "if", "else", "for", "while", "do", "switch", "case", "default", "try", "catch",
        "class", "struct", "union", "enum", "namespace", "template", "public", "private",
        "protected", "extern",
    ],
    skip_prefixes: &["[[", "*"],
    macro_lines: true,
};

const DOC_SKIP: &[&str] = &["template", "[["];

lazy_static! {
    static ref INCLUDE: Regex =
        Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*([<"])([^>"\n]+)[>"]"#).unwrap();
    static ref NAMESPACE: Regex =
        Regex::new(r"\b(?:inline\s+)?namespace(?:\s+(?P<name>[A-Za-z_][\w:]*))?\s*\{").unwrap();
    static ref EXTERN_BLOCK: Regex = Regex::new(r#"\bextern\s*"\s*"\s*\{"#).unwrap();
    static ref CLASS: Regex = Regex::new(
        r"(?:template\s*<[^;{}]*>\s*)?(?P<decl>(?P<kind>class|struct|union)\s+(?:(?:alignas\s*\([^)]*\)|\[\[[^\]]*\]\]|[A-Z_][A-Z0-9_]*)\s+)*(?P<name>[A-Za-z_]\w*)(?:\s*<[^;{}]*>)?(?:\s+final)?)\s*(?P<tail>[:{])"
    )
    .unwrap();
    static ref ACCESS: Regex = Regex::new(r"\b(public|protected|private)\s*:").unwrap();
    static ref FUNCTION: Regex = Regex::new(
        r"(?:template\s*<[^;{}]*>\s*)?(?:\[\[[^\]]*\]\]\s*)*(?P<decl>(?P<mods>(?:(?:static|inline|virtual|explicit|constexpr|consteval|extern|friend|[A-Z_][A-Z0-9_]*)\s+)*)(?P<ret>(?:(?:const|volatile|unsigned|signed|long|short|typename|struct|enum)\s+)*[A-Za-z_][\w:]*(?:\s*<[^;{}()]*>)?(?:\s*[*&]+|\s+const\b)*[\s*&]+)?(?P<name>(?:[A-Za-z_]\w*(?:\s*<[^;{}()]*?>)?\s*::\s*)*(?:~\s*[A-Za-z_]\w*|operator\s*(?:\(\)|\[\]|[^\sA-Za-z_(][^\s(]*|[A-Za-z_][\w:]*)|[A-Za-z_]\w*)))\s*\("
    )
    .unwrap();
    static ref FIELD: Regex = Regex::new(
        r"(?P<decl>(?P<mods>(?:(?:static|mutable|constexpr|inline|thread_local|volatile|const)\s+)*)(?P<type>(?:(?:const|unsigned|signed|long|short|struct|enum|typename)\s+)*[A-Za-z_][\w:]*(?:\s*<[^;{}]*?>)?(?:\s*[*&]+|\s+const\b)*)[\s*&]+(?P<name>[A-Za-z_]\w*))\s*(?:\[[^\]]*\]\s*)*(?:[;=,{]|:\s*\d)"
    )
    .unwrap();
    static ref DECLARATOR: Regex = Regex::new(r"^[\s*&]*([A-Za-z_]\w*)").unwrap();
    static ref TEMPLATE_ARGS: Regex = Regex::new(r"<[^<>]*>").unwrap();
    static ref DEPS: DependencyCollector = DependencyCollector::new(&DEPENDENCIES).unwrap();
    static ref RULES: Vec<Rule> = vec![
        Rule { name: "include", view: View::Original, pattern: &*INCLUDE, apply: include_directive },
        Rule { name: "namespace", view: View::Masked, pattern: &*NAMESPACE, apply: namespace_block },
        Rule { name: "extern", view: View::Masked, pattern: &*EXTERN_BLOCK, apply: extern_block },
        Rule { name: "class", view: View::Masked, pattern: &*CLASS, apply: class_decl },
        Rule { name: "access", view: View::Masked, pattern: &*ACCESS, apply: access_label },
        Rule { name: "function", view: View::Masked, pattern: &*FUNCTION, apply: function_decl },
        Rule { name: "field", view: View::Masked, pattern: &*FIELD, apply: field_decl },
    ];
}

/// C++ extractor (also used for C headers and sources).
#[derive(Debug, Default, Clone, Copy)]
pub struct CppExtractor;

impl CppExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageExtractor for CppExtractor {
    fn language_id(&self) -> &'static str {
        "cpp"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["cpp", "cc", "cxx", "c++", "hpp", "hh", "hxx", "h", "ipp", "inl"]
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["c++", "cplusplus", "cxx"]
    }

    fn extract(
        &self,
        source: &str,
        options: &ExtractOptions,
    ) -> Result<StructuralSummary, ExtractError> {
        let src = SourceText::new(source, &MaskRules::CPP)?;
        let mut scan = Scan::new(&src, options, self.language_id(), &DEPS);
        run_rules(&RULES, &mut scan)?;

        let hints = check_lines(&src.masked, &LINE_RULES);
        scan.errors.extend(hints.errors);
        scan.warnings.extend(hints.warnings);
        Ok(scan.finish())
    }
}

fn is_macro(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_uppercase() || c == '_')
        && word
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn include_directive(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let start = caps.get(0).map_or(0, |m| m.start());
    let path = caps[2].trim().to_string();
    scan.imports.push(ImportInfo {
        is_external: &caps[1] == "<",
        imports: vec![ImportSpecifier {
            name: path.clone(),
            alias: None,
            is_default: false,
        }],
        source: path,
        is_static: false,
        line: scan.line(start),
    });
    Ok(())
}

fn namespace_block(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let Some(whole) = caps.get(0) else {
        return Ok(());
    };
    if !at_statement_start(scan.masked(), whole.start(), false) {
        return Ok(());
    }
    let name = caps.name("name").map(|m| m.as_str().to_string());
    scan.trace("namespace", name.as_deref().unwrap_or("<anonymous>"), scan.line(whole.start()));
    scan.blocks.insert(whole.end() - 1, Block::Namespace(name));
    Ok(())
}

fn extern_block(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    if let Some(whole) = caps.get(0) {
        scan.blocks.insert(whole.end() - 1, Block::Extern);
    }
    Ok(())
}

fn class_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let (Some(whole), Some(decl), Some(name), Some(tail)) = (
        caps.get(0),
        caps.name("decl"),
        caps.name("name"),
        caps.name("tail"),
    ) else {
        return Ok(());
    };
    let masked = scan.masked();

    // `typedef struct Node { ... } Node;`
    let before = masked[..whole.start()].trim_end();
    let start = match before.strip_suffix("typedef") {
        Some(rest) => rest.len(),
        None => whole.start(),
    };
    if !at_statement_start(masked, start, true) {
        return Ok(());
    }

    let (open, bases) = if tail.as_str() == "{" {
        (tail.start(), "")
    } else {
        if masked.as_bytes().get(tail.end()) == Some(&b':') {
            return Ok(());
        }
        let Some(open) = find_body_open(masked, tail.end()) else {
            return Ok(());
        };
        (open, scan.src.masked_slice(tail.end(), open)?)
    };

    let mut bases = split_top_level(bases, ',')
        .into_iter()
        .map(|base| {
            let words: Vec<&str> = base
                .split_whitespace()
                .filter(|w| !matches!(*w, "public" | "protected" | "private" | "virtual"))
                .collect();
            normalize_space(&words.join(" "))
        })
        .filter(|b| !b.is_empty());
    let extends = bases.next();
    let implements: Vec<String> = bases.collect();

    let kind = match &caps["kind"] {
        "struct" => ClassKind::Struct,
        "union" => ClassKind::Union,
        _ => ClassKind::Class,
    };
    let parent = scan.class_at(whole.start());
    let visible_in_parent = parent
        .and_then(|idx| scan.classes.get(idx))
        .map_or(true, |p| p.visibility_at(whole.start()) == Visibility::Public);

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
        is_exported: visible_in_parent && !scan.in_anonymous_namespace(whole.start()),
        is_abstract: false,
        docstring: scan.docstring(decl.start(), DOC_SKIP),
        namespace: scan.namespace_at(whole.start()),
    };
    let default_visibility = if kind == ClassKind::Class {
        Visibility::Private
    } else {
        Visibility::Public
    };
    scan.add_class(ClassDraft {
        info,
        open,
        close: body.close,
        nested: scan.in_any_class(whole.start()),
        default_visibility,
        access_labels: Vec::new(),
    });
    scan.check_terminated(&body, name.as_str(), decl.start());
    Ok(())
}

fn access_label(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let Some(whole) = caps.get(0) else {
        return Ok(());
    };
    if scan.masked().as_bytes().get(whole.end()) == Some(&b':') {
        return Ok(());
    }
    let visibility = match &caps[1] {
        "public" => Visibility::Public,
        "protected" => Visibility::Protected,
        _ => Visibility::Private,
    };
    if let Some(idx) = scan.class_at(whole.start()) {
        if let Some(draft) = scan.classes.get_mut(idx) {
            draft.access_labels.push((whole.start(), visibility));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    Body(usize),
    Prototype(usize),
    Pure(usize),
    Defaulted(usize),
}

/// Everything between a parameter list and the body or `;`.
#[derive(Debug)]
struct Trailer {
    ending: Ending,
    trailing_return: Option<(usize, usize)>,
}

fn trailer(masked: &str, after: usize) -> Option<Trailer> {
    let bytes = masked.as_bytes();
    let mut trailing_return = None;
    let mut i = after;
    loop {
        i = skip_whitespace(masked, i);
        let rest = &masked[i..];
        let ending = match bytes.get(i)? {
            b'{' => Ending::Body(i),
            b';' => Ending::Prototype(i),
            b'=' => {
                let value = rest[1..].trim_start();
                let semi = i + rest.find(';')?;
                if value.starts_with('0') {
                    Ending::Pure(semi)
                } else if value.starts_with("default") || value.starts_with("delete") {
                    Ending::Defaulted(semi)
                } else {
                    return None;
                }
            }
            b':' if !rest.starts_with("::") => Ending::Body(initializer_list_end(masked, i + 1)?),
            b'-' if rest.starts_with("->") => {
                let start = i + 2;
                let end = start + rest[2..].find(['{', ';', '='])?;
                trailing_return = Some((start, end));
                i = end;
                continue;
            }
            b'&' => {
                i += if rest.starts_with("&&") { 2 } else { 1 };
                continue;
            }
            _ => {
                let word: &str = rest
                    .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .next()
                    .unwrap_or("");
                match word {
                    "const" | "volatile" | "override" | "final" | "mutable" | "try" => {
                        i += word.len();
                    }
                    "noexcept" | "throw" => {
                        i = skip_whitespace(masked, i + word.len());
                        if bytes.get(i) == Some(&b'(') {
                            i = match_delimiter(masked, i).close + 1;
                        }
                    }
                    _ => return None,
                }
                continue;
            }
        };
        return Some(Trailer {
            ending,
            trailing_return,
        });
    }
}

/// Body `{` after a constructor initializer list starting at `from`.
fn initializer_list_end(masked: &str, from: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => i = match_delimiter(masked, i).close,
            b'{' => {
                let prev = masked[..i].trim_end().bytes().last();
                let brace_init = prev.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'>');
                if !brace_init {
                    return Some(i);
                }
                i = match_delimiter(masked, i).close;
            }
            b';' | b'}' => return None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// `Foo<T>::bar` → (`Some("Foo")`, `"bar"`).
fn split_qualified(name: &str) -> (Option<String>, String) {
    let plain = TEMPLATE_ARGS.replace_all(name, "");
    let compact: String = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    match compact.rfind("::") {
        Some(idx) if !compact[..idx].trim().is_empty() => (
            Some(compact[..idx].replace(' ', "")),
            compact[idx + 2..].trim().to_string(),
        ),
        _ => (None, compact.trim_start_matches("::").trim().to_string()),
    }
}

fn function_decl(scan: &mut Scan<'_>, caps: &Captures<'_>) -> Result<(), ExtractError> {
    let (Some(whole), Some(decl), Some(name_match)) =
        (caps.get(0), caps.name("decl"), caps.name("name"))
    else {
        return Ok(());
    };
    let masked = scan.masked();
    if !at_statement_start(masked, whole.start(), true) {
        return Ok(());
    }
    let (receiver, name) = split_qualified(name_match.as_str());
    let is_operator = name.starts_with("operator");
    let is_destructor = name.starts_with('~');
    if KEYWORDS.contains(&name.as_str()) {
        return Ok(());
    }

    let mods: Vec<&str> = caps
        .name("mods")
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default();
    let declared_ret = match caps.name("ret") {
        Some(ret) => {
            let text = scan.stripped_text(ret.start(), name_match.start())?;
            if text
                .split_whitespace()
                .next()
                .is_some_and(|w| NON_TYPES.contains(&w))
            {
                return Ok(());
            }
            Some(text)
        }
        None => None,
    };

    let paren = whole.end() - 1;
    let params_end = match_delimiter(masked, paren);
    if !params_end.terminated {
        return Ok(());
    }
    let Some(trailer) = trailer(masked, params_end.close + 1) else {
        return Ok(());
    };

    let class = scan.class_at(whole.start());
    let owner = match (class, &receiver) {
        (Some(idx), _) => scan.classes.get(idx).map(|c| c.info.name.clone()),
        (None, Some(recv)) => recv.rsplit("::").next().map(str::to_string),
        (None, None) => None,
    };
    let is_constructor = declared_ret.is_none() && owner.as_deref() == Some(name.as_str());

    let return_type = match (&declared_ret, trailer.trailing_return) {
        (ret, Some((start, end))) if ret.as_deref().map_or(true, |r| r == "auto") => {
            let text = scan.stripped_text(start, end)?;
            Some(
                text.trim_end_matches("override")
                    .trim_end_matches("final")
                    .trim()
                    .to_string(),
            )
        }
        (Some(ret), _) => Some(ret.clone()),
        (None, _) if is_constructor || is_destructor || is_operator => None,
        // `BOOL Init();`, `T max(T a, T b)`: the return type was taken as a
        // macro-like modifier.
        (None, _) => match mods.last().copied().filter(|w| is_macro(w)) {
            Some(word) => Some(word.to_string()),
            None => return Ok(()),
        },
    };

    // Top-level prototypes are skipped; only definitions count.
    if class.is_none()
        && (!matches!(trailer.ending, Ending::Body(_)) || !scan.at_top_level(whole.start()))
    {
        return Ok(());
    }

    let parameters =
        parse_parameter_list(scan.src.stripped_slice(paren + 1, params_end.close)?, &PARAMS);
    let (end_line, complexity, dependencies) = match trailer.ending {
        Ending::Body(open) => {
            let body = scan.body(open)?;
            scan.check_terminated(&body, &name, decl.start());
            (body.end_line, body.complexity, body.dependencies)
        }
        Ending::Prototype(end) | Ending::Pure(end) | Ending::Defaulted(end) => {
            (scan.line(end), 1, Default::default())
        }
    };
    let is_abstract = matches!(trailer.ending, Ending::Prototype(_) | Ending::Pure(_));
    let is_static = mods.contains(&"static");

    let is_exported = match class.and_then(|idx| scan.classes.get(idx)) {
        Some(draft) => draft.visibility_at(whole.start()) == Visibility::Public,
        None => !is_static && !scan.in_anonymous_namespace(whole.start()),
    };

    let function = FunctionInfo {
        test_candidates: test_candidates(&name, parameters.len(), CandidateStyle::Snake),
        name,
        parameters,
        return_type,
        start_line: scan.line(decl.start()),
        end_line,
        complexity,
        dependencies,
        is_exported,
        is_static,
        is_constructor,
        is_abstract,
        docstring: scan.docstring(decl.start(), DOC_SKIP),
        receiver: if class.is_some() { None } else { receiver },
        namespace: scan.namespace_at(whole.start()),
    };

    match class {
        Some(idx) => {
            if matches!(trailer.ending, Ending::Pure(_)) {
                if let Some(draft) = scan.classes.get_mut(idx) {
                    draft.info.is_abstract = true;
                }
            }
            scan.add_method(idx, function);
        }
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
    if !at_statement_start(masked, whole.start(), true) {
        return Ok(());
    }
    let type_words: Vec<&str> = ty.as_str().split_whitespace().collect();
    // `struct stat buf;` is a field, `struct Inner {` and `enum class E {` are not.
    let elaborated = type_words.len() > 1 && matches!(type_words[0], "struct" | "enum");
    if NON_TYPES.contains(&name.as_str())
        || (!elaborated && type_words.first().is_some_and(|w| NON_TYPES.contains(w)))
        || type_words.last().is_some_and(|w| NON_TYPES.contains(w))
    {
        return Ok(());
    }
    let Some(class) = scan.class_at(whole.start()) else {
        return Ok(());
    };
    let Some(draft) = scan.classes.get(class) else {
        return Ok(());
    };
    let visibility = draft.visibility_at(whole.start());
    let is_static = caps
        .name("mods")
        .is_some_and(|m| m.as_str().split_whitespace().any(|w| w == "static"));
    let r#type = scan.stripped_text(ty.start(), name.start())?;

    let end = statement_end(masked, name.start());
    let declarators = scan.src.masked_slice(name.start(), end)?;
    let mut offset = name.start();
    let mut properties = Vec::new();
    for piece in split_top_level(declarators, ',') {
        let stripped = scan.src.stripped_slice(offset, offset + piece.len())?;
        let (decl, default) = split_default(stripped);
        if let Some(m) = DECLARATOR.captures(decl).and_then(|c| c.get(1)) {
            properties.push(PropertyInfo {
                name: m.as_str().to_string(),
                r#type: r#type.clone(),
                visibility,
                is_static,
                line: scan.line(offset),
                default_value: default.map(normalize_space),
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
