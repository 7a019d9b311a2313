//! Heuristic cyclomatic complexity.
//!
//! Complexity is calculated as:
//! - Start at 1
//! - Add 1 for each: if, while, for, do, switch, case, catch, ?:, &&, ||
//!
//! `else if` contributes through its `if`. This is token counting over masked
//! body text, not a control-flow graph.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BRANCH_KEYWORD: Regex =
        Regex::new(r"\b(?:if|while|for|do|switch|case|catch)\b").unwrap();
}

/// Per-category counts behind a complexity score.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchCounts {
    pub keywords: usize,
    pub ternaries: usize,
    pub and_ops: usize,
    pub or_ops: usize,
}

impl BranchCounts {
    pub fn decision_points(&self) -> usize {
        self.keywords + self.ternaries + self.and_ops + self.or_ops
    }
}

/// Count decision points in `body`.
pub fn count_branches(body: &str) -> BranchCounts {
    BranchCounts {
        keywords: BRANCH_KEYWORD.find_iter(body).count(),
        ternaries: count_ternaries(body),
        and_ops: body.matches("&&").count(),
        or_ops: body.matches("||").count(),
    }
}

/// Complexity score for `body`, always at least 1.
pub fn score(body: &str) -> u32 {
    1 + count_branches(body).decision_points() as u32
}

/// `?` used as the conditional operator. Generic wildcards (`<?>`,
/// `<? extends T>`, `Map<?, ?>`) are not counted.
fn count_ternaries(body: &str) -> usize {
    let bytes = body.as_bytes();
    let mut count = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'?' {
            continue;
        }
        let prev = bytes[..i]
            .iter()
            .rev()
            .find(|c| !c.is_ascii_whitespace())
            .copied();
        let rest = body[i + 1..].trim_start();
        let wildcard = prev == Some(b'<')
            || prev == Some(b',')
            || rest.starts_with('>')
            || rest.starts_with(',')
            || rest.starts_with("extends ")
            || rest.starts_with("super ");
        if !wildcard {
            count += 1;
        }
    }
    count
}
