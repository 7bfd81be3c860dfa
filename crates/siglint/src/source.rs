//! Comment- and string-masked view of checked source.
//!
//! Every rule works on [`Line::code`], a copy of the source line in which
//! comment text and string-literal contents are replaced by spaces. Byte
//! offsets are preserved, so positions found in the masked text are valid
//! positions in the original source. String delimiters are kept so rules can
//! still see that a literal is present.

use siglint_core::span::Span;

/// One masked source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Byte offset of the line in the source.
    pub offset: usize,
    /// `{`/`}` nesting depth at the start of the line.
    pub depth: usize,
    pub code: String,
    /// The unmasked line.
    pub text: String,
}

impl Line {
    /// 1-based character column of byte `index` within the line.
    pub fn column(&self, index: usize) -> usize {
        match self.text.get(..index) {
            Some(before) => before.chars().count() + 1,
            None => self.code[..index].chars().count() + 1,
        }
    }

    /// Span of `start..end` (line-relative bytes) in the whole source.
    pub fn span(&self, start: usize, end: usize) -> Span {
        Span::new(self.offset + start..self.offset + end)
    }

    /// Statements of the line, split at `;`, `{` and `}` outside
    /// parentheses. Blank statements are skipped.
    pub fn statements(&self) -> Vec<Statement<'_>> {
        let mut statements = Vec::new();
        let mut depth = self.depth;
        let mut parens = 0usize;
        let mut start = 0;
        let mut start_depth = depth;
        for (index, byte) in self.code.bytes().enumerate() {
            match byte {
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                b';' | b'{' | b'}' if parens == 0 => {
                    push_statement(&mut statements, &self.code, start, index, start_depth);
                    match byte {
                        b'{' => depth += 1,
                        b'}' => depth = depth.saturating_sub(1),
                        _ => {}
                    }
                    start = index + 1;
                    start_depth = depth;
                }
                _ => {}
            }
        }
        push_statement(&mut statements, &self.code, start, self.code.len(), start_depth);
        statements
    }

    /// Every binding on the line, with line-relative positions.
    pub fn bindings(&self) -> Vec<(usize, Binding<'_>)> {
        self.statements()
            .into_iter()
            .filter_map(|statement| {
                let found = binding(statement.text)?;
                Some((
                    statement.depth,
                    Binding {
                        name_start: statement.start + found.name_start,
                        rhs_start: statement.start + found.rhs_start,
                        ..found
                    },
                ))
            })
            .collect()
    }
}

/// One statement of a masked line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Statement<'a> {
    /// Byte index of the statement in the line.
    pub start: usize,
    /// `{`/`}` nesting depth the statement sits at.
    pub depth: usize,
    pub text: &'a str,
}

fn push_statement<'a>(
    statements: &mut Vec<Statement<'a>>,
    code: &'a str,
    start: usize,
    end: usize,
    depth: usize,
) {
    let text = &code[start..end];
    if !text.trim().is_empty() {
        statements.push(Statement { start, depth, text });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    String,
    BlockComment,
}

/// Masked lines of a whole source text.
#[derive(Debug, Clone)]
pub(crate) struct Source {
    lines: Vec<Line>,
}

impl Source {
    pub fn parse(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut mode = Mode::Code;
        let mut depth = 0usize;
        let mut offset = 0;

        for (index, raw) in text.split('\n').enumerate() {
            let raw_line = raw.strip_suffix('\r').unwrap_or(raw);
            let start_depth = depth;
            let mut code = String::with_capacity(raw_line.len());
            // A string never continues onto the next line.
            if mode == Mode::String {
                mode = Mode::Code;
            }

            let mut chars = raw_line.char_indices().peekable();
            while let Some((_, c)) = chars.next() {
                match mode {
                    Mode::Code => match c {
                        '/' if chars.peek().is_some_and(|&(_, next)| next == '/') => {
                            mask_rest(&mut code, raw_line.len());
                            break;
                        }
                        '/' if chars.peek().is_some_and(|&(_, next)| next == '*') => {
                            chars.next();
                            code.push_str("  ");
                            mode = Mode::BlockComment;
                        }
                        '"' => {
                            code.push('"');
                            mode = Mode::String;
                        }
                        '{' => {
                            depth += 1;
                            code.push(c);
                        }
                        '}' => {
                            depth = depth.saturating_sub(1);
                            code.push(c);
                        }
                        _ => code.push(c),
                    },
                    Mode::String => match c {
                        '\\' => {
                            code.push(' ');
                            if let Some((_, escaped)) = chars.next() {
                                mask(&mut code, escaped);
                            }
                        }
                        '"' => {
                            code.push('"');
                            mode = Mode::Code;
                        }
                        _ => mask(&mut code, c),
                    },
                    Mode::BlockComment => {
                        if c == '*' && chars.peek().is_some_and(|&(_, next)| next == '/') {
                            chars.next();
                            code.push_str("  ");
                            mode = Mode::Code;
                        } else {
                            mask(&mut code, c);
                        }
                    }
                }
            }

            lines.push(Line {
                number: index + 1,
                offset,
                depth: start_depth,
                code,
                text: raw_line.to_string(),
            });
            offset += raw.len() + 1;
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }
}

fn mask(code: &mut String, c: char) {
    code.extend(std::iter::repeat_n(' ', c.len_utf8()));
}

fn mask_rest(code: &mut String, len: usize) {
    let remaining = len - code.len();
    code.extend(std::iter::repeat_n(' ', remaining));
}

/// A top-level binding `name = rhs` (but not `name == ...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Binding<'a> {
    pub name: &'a str,
    /// Byte index of `name` in the line.
    pub name_start: usize,
    pub rhs: &'a str,
    /// Byte index of the right-hand side in the line.
    pub rhs_start: usize,
}

/// Recognise `name = ...` at the start of a line.
pub(crate) fn binding(code: &str) -> Option<Binding<'_>> {
    let name_start = code.len() - code.trim_start().len();
    let rest = &code[name_start..];
    let name_len = identifier_len(rest);
    if name_len == 0 {
        return None;
    }
    let name = &rest[..name_len];
    let after_name = &rest[name_len..];
    let after_ws = after_name.trim_start();
    let rhs_full = after_ws.strip_prefix('=')?;
    if rhs_full.starts_with('=') {
        return None;
    }
    let rhs = rhs_full.trim_start();
    let rhs_start = code.len() - rhs.len();
    Some(Binding {
        name,
        name_start,
        rhs,
        rhs_start,
    })
}

/// Length in bytes of the identifier at the start of `text`, or 0.
pub(crate) fn identifier_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(first) if first.is_ascii_alphabetic() || *first == b'_' => bytes
            .iter()
            .position(|b| !is_ident_byte(*b))
            .unwrap_or(bytes.len()),
        _ => 0,
    }
}

pub(crate) fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// A `prefix.name` reference in masked code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct QualifiedRef<'a> {
    pub prefix: &'a str,
    pub name: &'a str,
    /// Byte index of `prefix`.
    pub start: usize,
    /// Byte index just past `name`.
    pub end: usize,
    /// Byte index of the `(` opening a call, if the reference is called.
    pub call_open: Option<usize>,
}

impl QualifiedRef<'_> {
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.prefix, self.name)
    }
}

/// Every `prefix.name` reference in `code`. Chains such as `a.b.c` and
/// numbers such as `1.5` are not references.
pub(crate) fn qualified_refs(code: &str) -> Vec<QualifiedRef<'_>> {
    let bytes = code.as_bytes();
    let mut refs = Vec::new();
    let mut index = 0;
    while index < bytes.len() {
        let at_boundary = index == 0 || !(is_ident_byte(bytes[index - 1]) || bytes[index - 1] == b'.');
        let prefix_len = if at_boundary {
            identifier_len(&code[index..])
        } else {
            0
        };
        if prefix_len == 0 {
            index += 1;
            continue;
        }

        let dot = index + prefix_len;
        let name_len = if bytes.get(dot) == Some(&b'.') {
            identifier_len(&code[dot + 1..])
        } else {
            0
        };
        if name_len == 0 {
            index = dot;
            continue;
        }
        let end = dot + 1 + name_len;
        if bytes.get(end) == Some(&b'.') {
            // a.b.c: skip the whole chain
            index = end + 1;
            while index < bytes.len() && (is_ident_byte(bytes[index]) || bytes[index] == b'.') {
                index += 1;
            }
            continue;
        }

        let after = &code[end..];
        let paren = end + (after.len() - after.trim_start().len());
        let call_open = (bytes.get(paren) == Some(&b'(')).then_some(paren);
        refs.push(QualifiedRef {
            prefix: &code[index..dot],
            name: &code[dot + 1..end],
            start: index,
            end,
            call_open,
        });
        index = end;
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(text: &str) -> Vec<String> {
        Source::parse(text)
            .lines()
            .iter()
            .map(|line| line.code.clone())
            .collect()
    }

    #[test]
    fn test_line_comment_is_masked() {
        assert_eq!(codes("x = 1; // fi.foo(1)"), ["x = 1;             "]);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let masked = codes("a /* one\ntwo */ b");
        assert_eq!(masked, ["a       ", "       b"]);
    }

    #[test]
    fn test_string_contents_are_masked() {
        assert_eq!(codes(r#"declare name "a, b / c";"#), [r#"declare name "        ";"#]);
        assert_eq!(codes(r#"s = "q\"x";"#), [r#"s = "    ";"#]);
    }

    #[test]
    fn test_masking_preserves_byte_offsets() {
        let text = "a = \"héllo\"; // ünïcode\nprocess = a;";
        let source = Source::parse(text);
        for line in source.lines() {
            let original = &text[line.offset..line.offset + line.code.len()];
            assert_eq!(original.len(), line.code.len());
        }
        assert_eq!(source.lines()[1].offset, text.find("process").expect("process"));
    }

    #[test]
    fn test_depth_tracks_braces() {
        let source = Source::parse("env = environment {\n  x = 1;\n};\nprocess = env.x;");
        let depths: Vec<_> = source.lines().iter().map(|line| line.depth).collect();
        assert_eq!(depths, [0, 1, 1, 0]);
    }

    #[test]
    fn test_column_counts_original_characters() {
        let source = Source::parse("s = \"héllo\"; x = fi.lowpass(1);");
        let line = &source.lines()[0];
        let index = line.code.find("fi.").expect("reference");
        assert_eq!(line.column(index), 18);
    }

    #[test]
    fn test_statements_split_outside_parentheses() {
        let source = Source::parse("g = f(1; 2); process = g; fx = environment { a = 1; };");
        let statements: Vec<_> = source.lines()[0]
            .statements()
            .iter()
            .map(|statement| (statement.text.trim(), statement.depth))
            .collect();
        assert_eq!(
            statements,
            [
                ("g = f(1; 2)", 0),
                ("process = g", 0),
                ("fx = environment", 0),
                ("a = 1", 1),
            ]
        );
    }

    #[test]
    fn test_bindings_after_other_statements() {
        let source = Source::parse("import(\"stdfaust.lib\"); process = os.osc(440);");
        let line = &source.lines()[0];
        let bindings = line.bindings();
        assert_eq!(bindings.len(), 1);
        let (depth, found) = bindings[0];
        assert_eq!(depth, 0);
        assert_eq!(found.name, "process");
        assert_eq!(&line.code[found.name_start..found.name_start + 7], "process");
        assert_eq!(&line.code[found.rhs_start..found.rhs_start + 6], "os.osc");
    }

    #[test]
    fn test_binding() {
        let found = binding("  gain = hslider(\"g\", 0, 0, 1, 0.1);").expect("binding");
        assert_eq!(found.name, "gain");
        assert_eq!(found.name_start, 2);
        assert!(found.rhs.starts_with("hslider"));
        assert_eq!(found.rhs_start, 9);

        assert!(binding("a == b").is_none());
        assert!(binding("f(x) = x;").is_none());
        assert!(binding("_ : _").is_none());
    }

    #[test]
    fn test_qualified_refs() {
        let refs = qualified_refs("process = os.osc(440) : fi.lowpass (2, 1000) : ma.PI * 1.5;");
        let names: Vec<_> = refs.iter().map(QualifiedRef::full_name).collect();
        assert_eq!(names, ["os.osc", "fi.lowpass", "ma.PI"]);
        assert!(refs[0].call_open.is_some());
        assert!(refs[1].call_open.is_some());
        assert!(refs[2].call_open.is_none());
    }

    #[test]
    fn test_qualified_refs_skip_chains() {
        assert!(qualified_refs("x = a.b.c(1);").is_empty());
        assert!(qualified_refs("x = 0.5 + 2.25;").is_empty());
    }
}
