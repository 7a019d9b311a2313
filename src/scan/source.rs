//! Source text pre-pass: comment/literal masking and line mapping.
//!
//! Recognizers never look at raw source. They run over a *masked* copy in
//! which comments and string/char literal contents are replaced by spaces
//! byte-for-byte, so every offset (and therefore every line number) in the
//! masked copy is valid in the original.

use crate::analysis::ExtractError;
use crate::scan::BraceIndex;

/// Lexical conventions used by the masking pass.
#[derive(Debug, Clone, Copy)]
pub struct MaskRules {
    /// Java `"""` text blocks.
    pub text_blocks: bool,
    /// C++ raw strings: `R"delim( ... )delim"`.
    pub raw_strings: bool,
    /// Blank `#...` preprocessor lines, including `\` continuations.
    pub preprocessor: bool,
    /// C++14 digit separators (`1'000'000`) are not char literals.
    pub digit_separators: bool,
}

impl MaskRules {
    pub const JAVA: MaskRules = MaskRules {
        text_blocks: true,
        raw_strings: false,
        preprocessor: false,
        digit_separators: false,
    };

    pub const CPP: MaskRules = MaskRules {
        text_blocks: false,
        raw_strings: true,
        preprocessor: true,
        digit_separators: true,
    };
}

/// Maps byte offsets to 1-based line and column numbers.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// 1-based line containing `offset`. Offsets past the end map to the last line.
    pub fn line_of(&self, offset: usize) -> usize {
        let offset = offset.min(self.len);
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx + 1,
            Err(idx) => idx,
        }
    }

    /// 1-based column (in characters) of `offset` within its line.
    pub fn column_of(&self, text: &str, offset: usize) -> usize {
        let offset = offset.min(self.len);
        let start = self.line_start(self.line_of(offset));
        text.get(start..offset)
            .map(|prefix| prefix.chars().count() + 1)
            .unwrap_or(offset - start + 1)
    }

    /// Byte offset where 1-based `line` starts.
    pub fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line.saturating_sub(1))
            .copied()
            .unwrap_or(self.len)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// One source file prepared for recognition.
#[derive(Debug)]
pub struct SourceText<'a> {
    /// Text exactly as given by the caller.
    pub original: &'a str,
    /// Comments (and preprocessor lines, when enabled) blanked; literals intact.
    pub stripped: String,
    /// `stripped` with string/char literal contents blanked as well.
    pub masked: String,
    pub lines: LineIndex,
    /// Enclosing-block table over `masked`.
    pub braces: BraceIndex,
    original_lines: Vec<&'a str>,
}

impl<'a> SourceText<'a> {
    pub fn new(original: &'a str, rules: &MaskRules) -> Result<Self, ExtractError> {
        let (stripped, masked) = mask(original, rules)?;
        let braces = BraceIndex::new(&masked);
        Ok(Self {
            original,
            stripped,
            masked,
            braces,
            lines: LineIndex::new(original),
            original_lines: original.lines().collect(),
        })
    }

    pub fn line_of(&self, offset: usize) -> usize {
        self.lines.line_of(offset)
    }

    pub fn column_of(&self, offset: usize) -> usize {
        self.lines.column_of(self.original, offset)
    }

    /// Original source split into lines (without terminators).
    pub fn original_lines(&self) -> &[&'a str] {
        &self.original_lines
    }

    pub fn masked_slice(&self, start: usize, end: usize) -> Result<&str, ExtractError> {
        slice(&self.masked, start, end)
    }

    pub fn stripped_slice(&self, start: usize, end: usize) -> Result<&str, ExtractError> {
        slice(&self.stripped, start, end)
    }
}

fn slice(text: &str, start: usize, end: usize) -> Result<&str, ExtractError> {
    text.get(start..end).ok_or(ExtractError::Span {
        start,
        end,
        len: text.len(),
    })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Preprocessor,
    Str,
    Char,
    TextBlock,
    Raw,
}

/// Produce the `(stripped, masked)` pair for `source`.
///
/// Delimiters are ASCII, so blanking whole regions between them never splits
/// a multi-byte character and both outputs stay valid UTF-8.
pub fn mask(source: &str, rules: &MaskRules) -> Result<(String, String), ExtractError> {
    let bytes = source.as_bytes();
    let mut stripped = bytes.to_vec();
    let mut masked = bytes.to_vec();
    let mut state = State::Code;
    let mut raw_close: Vec<u8> = Vec::new();
    let mut at_line_start = true;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();
        match state {
            State::Code => {
                if b == b'/' && next == Some(b'/') {
                    state = State::LineComment;
                    blank(&mut stripped, &mut masked, i, i + 2);
                    i += 2;
                    continue;
                }
                if b == b'/' && next == Some(b'*') {
                    state = State::BlockComment;
                    blank(&mut stripped, &mut masked, i, i + 2);
                    i += 2;
                    continue;
                }
                if rules.preprocessor && at_line_start && b == b'#' {
                    state = State::Preprocessor;
                    blank(&mut stripped, &mut masked, i, i + 1);
                    i += 1;
                    continue;
                }
                if rules.text_blocks && bytes[i..].starts_with(b"\"\"\"") {
                    state = State::TextBlock;
                    i += 3;
                    continue;
                }
                if rules.raw_strings && b == b'R' && next == Some(b'"') && !ident_before(bytes, i) {
                    if let Some(open) = bytes[i + 2..].iter().position(|&c| c == b'(') {
                        let delim = &bytes[i + 2..i + 2 + open];
                        raw_close = Vec::with_capacity(delim.len() + 2);
                        raw_close.push(b')');
                        raw_close.extend_from_slice(delim);
                        raw_close.push(b'"');
                        state = State::Raw;
                        i += 3 + open;
                        continue;
                    }
                }
                if b == b'"' {
                    state = State::Str;
                } else if b == b'\'' {
                    let separator = rules.digit_separators
                        && i > 0
                        && bytes[i - 1].is_ascii_hexdigit()
                        && next.is_some_and(|c| c.is_ascii_hexdigit());
                    if !separator {
                        state = State::Char;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Code;
                } else {
                    blank(&mut stripped, &mut masked, i, i + 1);
                }
            }
            State::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    blank(&mut stripped, &mut masked, i, i + 2);
                    state = State::Code;
                    i += 2;
                    continue;
                }
                blank(&mut stripped, &mut masked, i, i + 1);
            }
            State::Preprocessor => {
                if b == b'\\' && next == Some(b'\n') {
                    blank(&mut stripped, &mut masked, i, i + 1);
                    i += 2;
                    continue;
                }
                if b == b'\n' {
                    state = State::Code;
                } else {
                    blank(&mut stripped, &mut masked, i, i + 1);
                }
            }
            State::Str | State::Char => {
                let quote = if state == State::Str { b'"' } else { b'\'' };
                if b == b'\\' {
                    blank_masked(&mut masked, i, (i + 2).min(bytes.len()));
                    i += 2;
                    continue;
                }
                if b == quote || b == b'\n' {
                    // Plain literals never span lines; a newline ends an unterminated one.
                    state = State::Code;
                } else {
                    blank_masked(&mut masked, i, i + 1);
                }
            }
            State::TextBlock => {
                if bytes[i..].starts_with(b"\"\"\"") {
                    state = State::Code;
                    i += 3;
                    continue;
                }
                if b == b'\\' {
                    blank_masked(&mut masked, i, (i + 2).min(bytes.len()));
                    i += 2;
                    continue;
                }
                blank_masked(&mut masked, i, i + 1);
            }
            State::Raw => {
                if bytes[i..].starts_with(&raw_close) {
                    state = State::Code;
                    i += raw_close.len();
                    continue;
                }
                blank_masked(&mut masked, i, i + 1);
            }
        }

        if b == b'\n' {
            at_line_start = true;
        } else if !b.is_ascii_whitespace() {
            at_line_start = false;
        }
        i += 1;
    }

    Ok((String::from_utf8(stripped)?, String::from_utf8(masked)?))
}

fn ident_before(bytes: &[u8], i: usize) -> bool {
    i > 0 && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'_')
}

fn blank(stripped: &mut [u8], masked: &mut [u8], start: usize, end: usize) {
    let end = end.min(stripped.len());
    for i in start..end {
        if stripped[i] != b'\n' {
            stripped[i] = b' ';
            masked[i] = b' ';
        }
    }
}

fn blank_masked(masked: &mut [u8], start: usize, end: usize) {
    let end = end.min(masked.len());
    for b in &mut masked[start..end] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index() {
        let text = "a\nbc\n\nd";
        let idx = LineIndex::new(text);
        assert_eq!(idx.line_of(0), 1);
        assert_eq!(idx.line_of(1), 1);
        assert_eq!(idx.line_of(2), 2);
        assert_eq!(idx.line_of(5), 3);
        assert_eq!(idx.line_of(6), 4);
        assert_eq!(idx.line_of(999), 4);
        assert_eq!(idx.line_count(), 4);
        assert_eq!(idx.column_of(text, 3), 2);
    }

    #[test]
    fn test_mask_preserves_offsets() {
        let src = "int x = 1; // a { comment\nString s = \"}{\";\n/* block\n { */ char c = '{';";
        let (stripped, masked) = mask(src, &MaskRules::JAVA).unwrap();
        assert_eq!(masked.len(), src.len());
        assert_eq!(stripped.len(), src.len());
        assert_eq!(masked.matches('\n').count(), src.matches('\n').count());
        assert!(!masked.contains('{'));
        assert!(!masked.contains('}'));
        assert!(stripped.contains("\"}{\""));
        assert!(!stripped.contains("comment"));
    }

    #[test]
    fn test_mask_escaped_quote() {
        let (_, masked) = mask(r#"a("x\"y{"); b{}"#, &MaskRules::JAVA).unwrap();
        assert!(masked.ends_with("b{}"));
        assert_eq!(masked.matches('{').count(), 1);
    }

    #[test]
    fn test_mask_preprocessor_and_raw_string() {
        let src = "#define X(a) \\\n  { a }\nauto s = R\"x(})x\";\nint y = 1'000;";
        let (stripped, masked) = mask(src, &MaskRules::CPP).unwrap();
        assert!(!stripped.contains("define"));
        assert!(!masked.contains('}'));
        assert!(masked.contains("int y = 1'000;"));
    }

    #[test]
    fn test_mask_multibyte() {
        let src = "s = \"héllo\"; // ünïcode\nx";
        let (stripped, masked) = mask(src, &MaskRules::JAVA).unwrap();
        assert_eq!(masked.len(), src.len());
        assert!(stripped.contains("héllo"));
        assert!(masked.ends_with('x'));
    }

    #[test]
    fn test_unterminated_string_stops_at_newline() {
        let (_, masked) = mask("a = \"open\nb { }", &MaskRules::JAVA).unwrap();
        assert!(masked.ends_with("b { }"));
    }
}
