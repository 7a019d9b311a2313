//! Parameter list parsing shared by the language extractors.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::ParameterInfo;

lazy_static! {
    static ref TRAILING_IDENT: Regex = Regex::new(r"([A-Za-z_$][\w$]*)\s*$").unwrap();
    static ref FN_POINTER_NAME: Regex = Regex::new(r"\(\s*[*&^]\s*([A-Za-z_]\w*)\s*\)").unwrap();
    static ref ANNOTATION: Regex = Regex::new(r"@[\w.]+(?:\s*\([^)]*\))?").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Language conventions for parameter declarations.
#[derive(Debug, Clone, Copy)]
pub struct ParamSyntax {
    /// Leading words dropped from a declaration (`final`, `register`).
    pub modifiers: &'static [&'static str],
    /// Words that are types on their own, never parameter names.
    pub type_words: &'static [&'static str],
    /// `@Annotation(...)` prefixes are dropped.
    pub annotations: bool,
    /// `= value` defaults are recognized.
    pub defaults: bool,
}

/// Split `text` at `sep` where no (), [], {} or <> group is open.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' => angle += 1,
            '>' if prev != '-' && angle > 0 => angle -= 1,
            _ if c == sep && depth == 0 && angle == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&text[start..]);
    parts
}

/// Split a declaration at its top-level `=` (not `==`, `<=`, `>=`, `!=`).
pub fn split_default(decl: &str) -> (&str, Option<&str>) {
    let bytes = decl.as_bytes();
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b'=' if depth <= 0 => {
                let prev = if i > 0 { bytes[i - 1] } else { b' ' };
                let next = bytes.get(i + 1).copied().unwrap_or(b' ');
                if next != b'=' && !matches!(prev, b'=' | b'<' | b'>' | b'!') {
                    return (decl[..i].trim(), Some(decl[i + 1..].trim()));
                }
            }
            _ => {}
        }
    }
    (decl.trim(), None)
}

/// Collapse runs of whitespace to single spaces.
pub fn normalize_space(text: &str) -> String {
    SPACES.replace_all(text.trim(), " ").into_owned()
}

/// Parse the text between a declaration's parentheses.
pub fn parse_parameter_list(text: &str, syntax: &ParamSyntax) -> Vec<ParameterInfo> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == "void" {
        return Vec::new();
    }
    split_top_level(trimmed, ',')
        .into_iter()
        .filter_map(|p| parse_parameter(p, syntax))
        .collect()
}

/// Parse one parameter declaration. Returns `None` when neither a type nor a
/// name can be found.
pub fn parse_parameter(decl: &str, syntax: &ParamSyntax) -> Option<ParameterInfo> {
    let (decl, default) = if syntax.defaults {
        split_default(decl)
    } else {
        (decl.trim(), None)
    };

    let cleaned = if syntax.annotations {
        ANNOTATION.replace_all(decl, " ").into_owned()
    } else {
        decl.to_string()
    };
    let mut words: Vec<&str> = cleaned.split_whitespace().collect();
    while words.first().is_some_and(|w| syntax.modifiers.contains(w)) {
        words.remove(0);
    }
    let decl = words.join(" ");
    if decl.is_empty() {
        return None;
    }

    if decl == "..." {
        return Some(ParameterInfo {
            name: "...".to_string(),
            r#type: "...".to_string(),
            optional: true,
            default_value: None,
        });
    }

    let (ty, name) = split_type_and_name(&decl, syntax);
    if ty.is_empty() && name.is_empty() {
        return None;
    }

    Some(ParameterInfo {
        name,
        r#type: ty,
        optional: default.is_some(),
        default_value: default.map(str::to_string),
    })
}

fn split_type_and_name(decl: &str, syntax: &ParamSyntax) -> (String, String) {
    // void (*callback)(int)
    if let Some(m) = FN_POINTER_NAME.captures(decl).and_then(|c| c.get(1)) {
        let ty = format!("{}{}", &decl[..m.start()], &decl[m.end()..]);
        return (normalize_space(&ty), m.as_str().to_string());
    }

    // int values[], char buf[16]
    let mut core = decl.trim_end();
    let mut array_suffix = String::new();
    while core.ends_with(']') {
        match core.rfind('[') {
            Some(open) => {
                array_suffix.insert_str(0, &core[open..]);
                core = core[..open].trim_end();
            }
            None => break,
        }
    }

    let Some(caps) = TRAILING_IDENT.captures(core) else {
        return (normalize_space(&format!("{}{}", core, array_suffix)), String::new());
    };
    let Some(ident) = caps.get(1) else {
        return (normalize_space(core), String::new());
    };
    let prefix = core[..ident.start()].trim_end();
    let name = ident.as_str();

    let type_only = prefix.is_empty()
        || prefix.ends_with("::")
        || (prefix.ends_with('.') && !prefix.ends_with("..."))
        || syntax.type_words.contains(&name)
        || prefix
            .split_whitespace()
            .all(|w| syntax.type_words.contains(&w) && is_qualifier(w));
    if type_only {
        return (normalize_space(&format!("{}{}", core, array_suffix)), String::new());
    }

    (
        normalize_space(&format!("{}{}", prefix, array_suffix)),
        name.to_string(),
    )
}

fn is_qualifier(word: &str) -> bool {
    matches!(word, "unsigned" | "signed" | "long" | "short" | "const" | "volatile")
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAVA: ParamSyntax = ParamSyntax {
        modifiers: &["final"],
        type_words: &["int", "long", "boolean", "double", "float", "char", "byte", "short"],
        annotations: true,
        defaults: false,
    };

    const CPP: ParamSyntax = ParamSyntax {
        modifiers: &["register"],
        type_words: &[
            "int", "long", "short", "char", "bool", "float", "double", "void", "unsigned",
            "signed", "const", "volatile", "auto",
        ],
        annotations: false,
        defaults: true,
    };

    #[test]
    fn test_split_top_level_respects_generics() {
        let parts = split_top_level("Map<String, List<Integer>> m, int x", ',');
        assert_eq!(parts, vec!["Map<String, List<Integer>> m", " int x"]);
    }

    #[test]
    fn test_java_parameters() {
        let params = parse_parameter_list(
            "final @NotNull String name, Map<String, Integer> counts, int... rest",
            &JAVA,
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name, "name");
        assert_eq!(params[0].r#type, "String");
        assert_eq!(params[1].name, "counts");
        assert_eq!(params[1].r#type, "Map<String, Integer>");
        assert_eq!(params[2].name, "rest");
        assert_eq!(params[2].r#type, "int...");
    }

    #[test]
    fn test_cpp_parameters_with_defaults() {
        let params = parse_parameter_list(
            "const std::string& label, int count = 3, double ratio = a >= b ? 1.0 : 2.0",
            &CPP,
        );
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name, "label");
        assert_eq!(params[0].r#type, "const std::string&");
        assert!(!params[0].optional);
        assert_eq!(params[1].default_value.as_deref(), Some("3"));
        assert!(params[1].optional);
        assert_eq!(params[2].default_value.as_deref(), Some("a >= b ? 1.0 : 2.0"));
    }

    #[test]
    fn test_cpp_unnamed_arrays_and_pointers() {
        let params = parse_parameter_list("int, char buf[16], void (*cb)(int), unsigned long", &CPP);
        assert_eq!(params[0].name, "");
        assert_eq!(params[0].r#type, "int");
        assert_eq!(params[1].name, "buf");
        assert_eq!(params[1].r#type, "char[16]");
        assert_eq!(params[2].name, "cb");
        assert_eq!(params[2].r#type, "void (*)(int)");
        assert_eq!(params[3].name, "");
        assert_eq!(params[3].r#type, "unsigned long");
    }

    #[test]
    fn test_void_and_empty_lists() {
        assert!(parse_parameter_list("void", &CPP).is_empty());
        assert!(parse_parameter_list("  ", &CPP).is_empty());
        // stray commas produce no malformed entries
        assert_eq!(parse_parameter_list("int a, , int b", &CPP).len(), 2);
    }

    #[test]
    fn test_variadic() {
        let params = parse_parameter_list("const char* fmt, ...", &CPP);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].r#type, "const char*");
        assert_eq!(params[1].name, "...");
    }

    #[test]
    fn test_function_pointer_name_inside_type() {
        let params = parse_parameter_list("void (*v)(int), int (*nt)(int)", &CPP);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "v");
        assert_eq!(params[0].r#type, "void (*)(int)");
        assert_eq!(params[1].name, "nt");
        assert_eq!(params[1].r#type, "int (*)(int)");
    }

    #[test]
    fn test_java_varargs_keep_name() {
        let params = parse_parameter_list("String... names, Object[]... rows", &JAVA);
        assert_eq!(params[0].name, "names");
        assert_eq!(params[0].r#type, "String...");
        assert_eq!(params[1].name, "rows");
        assert_eq!(params[1].r#type, "Object[]...");
    }
}
