//! Suggested test identifiers for a declaration.

use serde::{Deserialize, Serialize};

/// How candidate identifiers are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateStyle {
    /// `testGetNameSuccess`
    Camel,
    /// `test_getName_success`
    Snake,
}

/// Accessor convention a name follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
    Predicate,
}

/// Classify `name` by accessor prefix. The prefix must be followed by an
/// uppercase letter, digit, `_`, or the end of the name (`getX`, `is_ready`,
/// not `settle`).
pub fn accessor_kind(name: &str) -> Option<AccessorKind> {
    const PREFIXES: &[(&str, AccessorKind)] = &[
        ("get", AccessorKind::Getter),
        ("set", AccessorKind::Setter),
        ("is", AccessorKind::Predicate),
        ("has", AccessorKind::Predicate),
    ];

    PREFIXES.iter().find_map(|(prefix, kind)| {
        let rest = name.strip_prefix(prefix)?;
        match rest.chars().next() {
            None => Some(*kind),
            Some(c) if c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' => Some(*kind),
            _ => None,
        }
    })
}

/// Deterministic test identifiers for `name` with `param_count` parameters.
pub fn test_candidates(name: &str, param_count: usize, style: CandidateStyle) -> Vec<String> {
    let base = sanitize(name);
    let mut cases: Vec<&[&str]> = vec![&["success"]];
    if param_count > 0 {
        cases.push(&["invalid", "parameters"]);
        cases.push(&["null", "parameters"]);
    }
    match accessor_kind(&base) {
        Some(AccessorKind::Getter) => cases.push(&["returns", "expected", "value"]),
        Some(AccessorKind::Setter) => cases.push(&["updates", "value"]),
        Some(AccessorKind::Predicate) => {
            cases.push(&["returns", "true", "when", "condition", "met"]);
            cases.push(&["returns", "false", "when", "condition", "not", "met"]);
        }
        None => {}
    }

    cases
        .into_iter()
        .map(|words| spell(&base, words, style))
        .collect()
}

fn spell(base: &str, words: &[&str], style: CandidateStyle) -> String {
    match style {
        CandidateStyle::Snake => format!("test_{}_{}", base, words.join("_")),
        CandidateStyle::Camel => {
            let mut out = String::from("test");
            out.push_str(&capitalize(base));
            for w in words {
                out.push_str(&capitalize(w));
            }
            out
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reduce a declaration name (`operator==`, `~Widget`, `Foo::bar`) to an
/// identifier fragment.
fn sanitize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "anonymous".to_string()
    } else {
        trimmed.to_string()
    }
}
