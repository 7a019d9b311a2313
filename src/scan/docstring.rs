//! Association of comment blocks with the declaration that follows them.

/// Find the documentation for the declaration on 1-based `decl_line`.
///
/// Walks upward from the line above the declaration. Blank lines are
/// skipped, comment lines are collected, and the walk stops at the first code
/// line or at the opening `/*` of a block comment. A code line ending in a
/// trailing comment counts as code. Lines starting with one of
/// `skip_prefixes` (annotations, `template<...>` heads) are passed over while
/// nothing has been collected yet.
pub fn find_docstring(lines: &[&str], decl_line: usize, skip_prefixes: &[&str]) -> String {
    let mut collected: Vec<&str> = Vec::new();
    let mut in_block = false;
    let end = decl_line.saturating_sub(1).min(lines.len());

    for raw in lines[..end].iter().rev() {
        let line = raw.trim();

        if in_block {
            if let Some(open) = line.find("/*") {
                // `code(); /* comment` keeps only the comment part
                collected.push(&line[open..]);
                in_block = false;
                break;
            }
            collected.push(line);
            continue;
        }

        if line.is_empty() {
            continue;
        }
        if collected.is_empty() && skip_prefixes.iter().any(|p| line.starts_with(p)) {
            continue;
        }
        if line.starts_with("//") {
            collected.push(line);
            continue;
        }
        if line.ends_with("*/") {
            if line.starts_with("/*") {
                collected.push(line);
                break;
            }
            if line.contains("/*") {
                // trailing comment after code
                break;
            }
            collected.push(line);
            in_block = true;
            continue;
        }
        break;
    }

    if in_block {
        // no opening `/*` above: not a comment block
        return String::new();
    }
    collected.reverse();
    let text: Vec<&str> = collected.into_iter().map(strip_markers).collect();
    text.join("\n").trim().to_string()
}

fn strip_markers(line: &str) -> &str {
    let mut s = line.trim();
    for prefix in ["/**", "/*!", "/*", "///", "//!", "//"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.strip_suffix("*/") {
        s = rest;
    }
    let s = s.trim();
    match s.strip_prefix('*') {
        Some(rest) if !rest.starts_with('/') => rest.trim(),
        _ => s,
    }
}
