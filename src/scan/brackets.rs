//! Literal-aware bracket matching.

use std::collections::HashMap;

/// Result of matching an opening delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketMatch {
    /// Index of the closing delimiter, or the last valid index of the input
    /// when the block never closes.
    pub close: usize,
    /// False when input ended before depth returned to zero.
    pub terminated: bool,
}

fn closing_for(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        b'<' => Some(b'>'),
        _ => None,
    }
}

/// Find the delimiter closing the one at `open_index`.
///
/// Quoted string and char literals, `//` and `/* */` comments are skipped, so
/// delimiters inside them never affect depth. A literal left open at the end
/// of a line is closed there. If `open_index` does not hold
/// an opening delimiter, it is returned unchanged.
pub fn match_delimiter(text: &str, open_index: usize) -> BracketMatch {
    let bytes = text.as_bytes();
    let last = bytes.len().saturating_sub(1);
    let Some(&open) = bytes.get(open_index) else {
        return BracketMatch {
            close: last,
            terminated: false,
        };
    };
    let Some(close) = closing_for(open) else {
        return BracketMatch {
            close: open_index,
            terminated: true,
        };
    };

    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = open_index;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == b'\\' {
                i += 2;
                continue;
            }
            if b == q || b == b'\n' {
                quote = None;
            }
            i += 1;
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = bytes[i..]
                    .iter()
                    .position(|&c| c == b'\n')
                    .map_or(bytes.len(), |p| i + p);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = bytes[i + 2..]
                    .windows(2)
                    .position(|w| w == b"*/")
                    .map_or(bytes.len(), |p| i + 2 + p + 2);
                continue;
            }
            _ if b == open => depth += 1,
            _ if b == close => {
                depth -= 1;
                if depth == 0 {
                    return BracketMatch {
                        close: i,
                        terminated: true,
                    };
                }
            }
            _ => {}
        }
        i += 1;
    }

    BracketMatch {
        close: last,
        terminated: false,
    }
}

/// Index of the delimiter closing the one at `open_index` (end of input if unbalanced).
pub fn find_matching(text: &str, open_index: usize) -> usize {
    match_delimiter(text, open_index).close
}

/// Enclosing-block lookup over masked text.
///
/// Built with one forward pass; each query is a binary search. Only
/// meaningful on masked text, where no brace can sit inside a literal or
/// comment. A `}` with no open block is ignored.
#[derive(Debug, Clone, Default)]
pub struct BraceIndex {
    /// `(from, open)`: from offset `from` until the next entry, the innermost
    /// unmatched `{` is `open`.
    spans: Vec<(usize, Option<usize>)>,
    /// Innermost `{` enclosing each `{`.
    parents: HashMap<usize, Option<usize>>,
}

impl BraceIndex {
    pub fn new(masked: &str) -> Self {
        let mut spans = Vec::new();
        let mut parents = HashMap::new();
        let mut stack: Vec<usize> = Vec::new();
        for (i, b) in masked.bytes().enumerate() {
            match b {
                b'{' => {
                    parents.insert(i, stack.last().copied());
                    stack.push(i);
                    spans.push((i + 1, Some(i)));
                }
                b'}' => {
                    if stack.pop().is_some() {
                        spans.push((i + 1, stack.last().copied()));
                    }
                }
                _ => {}
            }
        }
        Self { spans, parents }
    }

    /// Nearest unmatched `{` before `pos`.
    pub fn enclosing_open(&self, pos: usize) -> Option<usize> {
        let idx = self.spans.partition_point(|(from, _)| *from <= pos);
        idx.checked_sub(1).and_then(|i| self.spans[i].1)
    }

    /// All enclosing `{` positions from innermost outward.
    pub fn enclosing_chain(&self, pos: usize) -> Vec<usize> {
        let mut chain = Vec::new();
        let mut current = self.enclosing_open(pos);
        while let Some(open) = current {
            chain.push(open);
            current = self.parents.get(&open).copied().flatten();
        }
        chain
    }
}

/// Index of the next byte in `text[from..]` that is not ASCII whitespace.
pub fn skip_whitespace(text: &str, from: usize) -> usize {
    text.as_bytes()
        .iter()
        .skip(from)
        .position(|b| !b.is_ascii_whitespace())
        .map_or(text.len(), |p| from + p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced() {
        let text = "f(a, (b), c) + 1";
        assert_eq!(find_matching(text, 1), 11);
        assert_eq!(find_matching(text, 5), 7);
    }

    #[test]
    fn test_ignores_literals() {
        let text = r#"{ s = "}"; c = '}'; t = "\"}"; }"#;
        let m = match_delimiter(text, 0);
        assert!(m.terminated);
        assert_eq!(m.close, text.len() - 1);
    }

    #[test]
    fn test_ignores_comments() {
        let text = "{ // }\n /* } */ }";
        assert_eq!(find_matching(text, 0), text.len() - 1);
    }

    #[test]
    fn test_unbalanced_returns_end_of_input() {
        let text = "class Foo { void bar() {";
        let m = match_delimiter(text, 10);
        assert!(!m.terminated);
        assert_eq!(m.close, text.len() - 1);
    }

    #[test]
    fn test_unterminated_string_literal() {
        let text = "{ \"never closes }";
        let m = match_delimiter(text, 0);
        assert!(!m.terminated);
        assert_eq!(m.close, text.len() - 1);
    }

    #[test]
    fn test_non_delimiter_and_out_of_range() {
        assert_eq!(find_matching("abc", 1), 1);
        assert_eq!(find_matching("", 0), 0);
        assert!(!match_delimiter("ab", 7).terminated);
    }

    #[test]
    fn test_deep_nesting_terminates() {
        let text = "(".repeat(10_000);
        let m = match_delimiter(&text, 0);
        assert!(!m.terminated);
        assert_eq!(m.close, 9_999);
    }

    #[test]
    fn test_enclosing_open() {
        let text = "ns { class A { void f() { x; } int y; } }";
        let index = BraceIndex::new(text);
        let y = text.find("int y").unwrap();
        assert_eq!(index.enclosing_open(y), Some(13));
        assert_eq!(index.enclosing_chain(y), vec![13, 3]);
        assert_eq!(index.enclosing_open(2), None);
        // the brace itself is not enclosing
        assert_eq!(index.enclosing_open(13), Some(3));
        assert_eq!(index.enclosing_open(text.len()), None);
    }

    #[test]
    fn test_enclosing_open_with_stray_close() {
        let text = "} a { b } } c { d";
        let index = BraceIndex::new(text);
        assert_eq!(index.enclosing_open(text.find('a').unwrap()), None);
        assert_eq!(index.enclosing_open(text.find('b').unwrap()), Some(4));
        assert_eq!(index.enclosing_open(text.find('c').unwrap()), None);
        assert_eq!(index.enclosing_open(text.find('d').unwrap()), Some(14));
        assert_eq!(index.enclosing_chain(text.len()), vec![14]);
    }

    #[test]
    fn test_brace_index_on_large_input() {
        let mut text = String::from("class Big {\n");
        for i in 0..50_000 {
            text.push_str(&format!("  void m{}() {{ call(); }}\n", i));
        }
        text.push_str("}\n");
        let index = BraceIndex::new(&text);
        let last = text.rfind("void").unwrap();
        assert_eq!(index.enclosing_open(last), Some(10));
        assert_eq!(index.enclosing_chain(text.len()), Vec::<usize>::new());
    }
}
