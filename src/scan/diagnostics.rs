//! Per-line syntax hints over masked source.
//!
//! Two best-effort checks:
//! - unbalanced parentheses (error)
//! - a statement line that looks like it is missing its terminator (warning)

use crate::analysis::Diagnostic;

/// Diagnostic codes.
pub const UNBALANCED_PARENS: &str = "UNBALANCED_PARENS";
pub const MISSING_TERMINATOR: &str = "MISSING_TERMINATOR";

/// Language conventions for the line checks.
#[derive(Debug, Clone, Copy)]
pub struct LineRules {
    /// First words of lines that are never plain statements.
    pub block_keywords: &'static [&'static str],
    /// Line prefixes that are never plain statements (`@`, `#`).
    pub skip_prefixes: &'static [&'static str],
    /// ALL_CAPS single-token lines are macro invocations.
    pub macro_lines: bool,
}

/// Hints produced for one file.
#[derive(Debug, Default)]
pub struct LineHints {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Run the line checks over `masked` text.
pub fn check_lines(masked: &str, rules: &LineRules) -> LineHints {
    let lines: Vec<&str> = masked.lines().collect();
    let mut hints = LineHints::default();
    let mut depth: i64 = 0;

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let depth_before = depth;
        let mut first_unmatched: Option<usize> = None;
        let mut open_stack: Vec<usize> = Vec::new();

        for (col, c) in line.chars().enumerate() {
            match c {
                '(' => {
                    depth += 1;
                    open_stack.push(col);
                }
                ')' => {
                    depth -= 1;
                    open_stack.pop();
                    if depth < 0 {
                        hints.errors.push(
                            Diagnostic::error("unexpected ')' without matching '('", line_no, col + 1)
                                .with_code(UNBALANCED_PARENS),
                        );
                        depth = 0;
                    }
                }
                _ => {}
            }
        }
        if let Some(&col) = open_stack.first() {
            first_unmatched = Some(col);
        }

        let trimmed = line.trim();
        if trimmed.ends_with(';') && depth_before == 0 && depth > 0 {
            let col = first_unmatched.unwrap_or(0);
            hints.errors.push(
                Diagnostic::error("unclosed '(' before end of statement", line_no, col + 1)
                    .with_code(UNBALANCED_PARENS),
            );
            depth = 0;
        }

        if depth_before == 0 && depth == 0 && looks_unterminated(trimmed, &lines[idx + 1..], rules) {
            let col = line.chars().take_while(|c| c.is_whitespace()).count();
            hints.warnings.push(
                Diagnostic::warning("statement may be missing a terminating ';'", line_no, col + 1)
                    .with_code(MISSING_TERMINATOR),
            );
        }
    }

    hints
}

fn looks_unterminated(line: &str, rest: &[&str], rules: &LineRules) -> bool {
    let Some(last) = line.chars().last() else {
        return false;
    };
    if !(last.is_alphanumeric() || matches!(last, '_' | '$' | ')' | ']' | '"' | '\'')) {
        return false;
    }
    if rules.skip_prefixes.iter().any(|p| line.starts_with(p)) {
        return false;
    }
    let first_word: String = line
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    if rules.block_keywords.contains(&first_word.as_str()) {
        return false;
    }
    if line.starts_with('}') {
        // `} else`, `} while (x)`, `} catch (E e)`
        let after = line.trim_start_matches('}').trim_start();
        let word: String = after
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if word.is_empty() || rules.block_keywords.contains(&word.as_str()) {
            return false;
        }
    }
    let single_token = !line.contains(char::is_whitespace);
    if rules.macro_lines
        && single_token
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    {
        return false;
    }

    let Some(next) = rest.iter().map(|l| l.trim()).find(|l| !l.is_empty()) else {
        return true;
    };
    const CONTINUATIONS: &[&str] = &[
        "{", ".", "->", ":", "?", "+", "-", "*", "/", "%", "&", "|", "^", "=", "<", ">", ",", ")",
        "throws", "extends", "implements", "permits", "[", "\"",
    ];
    if CONTINUATIONS.iter().any(|c| next.starts_with(c)) {
        return false;
    }
    if next.starts_with('}') && single_token {
        // last enum constant or initializer element
        return false;
    }
    true
}
