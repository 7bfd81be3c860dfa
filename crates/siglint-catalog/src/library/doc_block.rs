//! Line-oriented state machine over library documentation comments.
//!
//! Library sources document each function in a comment block:
//!
//! ```text
//! //-----------------------`(fi.)lowpass`--------------------------
//! // Nth-order Butterworth lowpass filter.
//! //
//! // #### Usage
//! //
//! // ```
//! // _ : lowpass(N,fc) : _
//! // ```
//! //
//! // Where:
//! //
//! // * `N`: filter order
//! // * `fc`: cutoff frequency (Hz)
//! //
//! // #### Example test program
//! //
//! // ```
//! // process = fi.lowpass(3, 1000);
//! // ```
//! //-----------------------------------------------------------------
//! lowpass(N,fc) = lowpass0_highpass1(0,N,fc);
//! ```
//!
//! [`DocBlockParser`] walks the file one line at a time through the states
//! of [`State`] and yields one [`DocBlock`] per recognised header. The code
//! line following a closed block is kept as its raw definition.

use indexmap::IndexMap;
use log::trace;

/// Parser state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Between documentation blocks.
    Outside,
    /// After a header line, collecting the description.
    InHeader,
    /// After `#### Usage`, collecting the usage snippet.
    InUsage,
    /// After `Where:`, collecting `* `param`: description` bullets.
    InParamDocs,
    /// After `#### Example`, collecting the example program.
    InExample,
}

/// One documented function, as found in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DocBlock {
    pub name: String,
    /// 1-based line of the header.
    pub line: usize,
    pub description: Vec<String>,
    pub usage: Vec<String>,
    pub param_docs: IndexMap<String, String>,
    pub example: Vec<String>,
    pub definition: Option<String>,
    description_closed: bool,
}

/// A dashed header whose text is not a function name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SkippedHeader {
    pub line: usize,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    /// A function header; holds the bare name.
    Header(&'a str),
    /// A dashed header that does not name a function.
    UnrecognizedHeader(&'a str),
    /// A dashed or `===` rule with no text.
    Rule,
    /// Comment text after `//`.
    Comment(&'a str),
    Code(&'a str),
}

/// Streaming documentation-block parser.
#[derive(Debug)]
pub(crate) struct DocBlockParser {
    state: State,
    in_fence: bool,
    current: Option<DocBlock>,
    pending: Option<DocBlock>,
    blocks: Vec<DocBlock>,
    skipped: Vec<SkippedHeader>,
}

impl DocBlockParser {
    pub fn new() -> Self {
        Self {
            state: State::Outside,
            in_fence: false,
            current: None,
            pending: None,
            blocks: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Parse a whole file.
    pub fn parse(source: &str) -> (Vec<DocBlock>, Vec<SkippedHeader>) {
        let mut parser = Self::new();
        for (index, line) in source.lines().enumerate() {
            parser.feed(index + 1, line);
        }
        parser.finish()
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Feed one line (1-based `line_no`).
    pub fn feed(&mut self, line_no: usize, line: &str) {
        let kind = classify(line);
        match kind {
            LineKind::Header(name) => {
                self.close_current(false);
                self.flush_pending();
                self.open(line_no, name);
            }
            LineKind::UnrecognizedHeader(text) => {
                self.close_current(false);
                self.flush_pending();
                self.skipped.push(SkippedHeader {
                    line: line_no,
                    text: text.to_string(),
                });
            }
            LineKind::Rule | LineKind::Blank => {
                if self.state != State::Outside && !self.in_fence {
                    self.close_current(true);
                }
            }
            LineKind::Code(code) => {
                if self.state != State::Outside {
                    self.close_current(true);
                }
                self.attach_definition(code);
            }
            LineKind::Comment(text) => {
                if self.state != State::Outside {
                    self.comment(text);
                }
            }
        }
    }

    /// Close any open block and return everything parsed.
    pub fn finish(mut self) -> (Vec<DocBlock>, Vec<SkippedHeader>) {
        self.close_current(true);
        self.flush_pending();
        (self.blocks, self.skipped)
    }

    fn open(&mut self, line_no: usize, name: &str) {
        trace!(line = line_no, name = name; "Documentation block opened");
        self.current = Some(DocBlock {
            name: name.to_string(),
            line: line_no,
            ..DocBlock::default()
        });
        self.transition(State::InHeader);
    }

    /// Close the open block. With `await_definition` the block waits for the
    /// next code line to be attached as its definition.
    fn close_current(&mut self, await_definition: bool) {
        self.in_fence = false;
        self.transition(State::Outside);
        if let Some(block) = self.current.take() {
            if await_definition {
                self.flush_pending();
                self.pending = Some(block);
            } else {
                self.blocks.push(block);
            }
        }
    }

    fn flush_pending(&mut self) {
        if let Some(block) = self.pending.take() {
            self.blocks.push(block);
        }
    }

    fn attach_definition(&mut self, code: &str) {
        if let Some(mut block) = self.pending.take() {
            if defines(code, &block.name) {
                block.definition = Some(code.to_string());
            }
            self.blocks.push(block);
        }
    }

    fn transition(&mut self, next: State) {
        if self.state != next {
            trace!(from:? = self.state, to:? = next; "Documentation state transition");
            self.state = next;
        }
    }

    fn comment(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.starts_with("```") {
            self.in_fence = !self.in_fence;
            return;
        }

        if !self.in_fence {
            if let Some(next) = section_state(trimmed) {
                if let Some(block) = self.current.as_mut() {
                    block.description_closed = true;
                }
                self.transition(next);
                return;
            }
        }

        let in_fence = self.in_fence;
        let state = self.state;
        let Some(block) = self.current.as_mut() else {
            return;
        };
        match state {
            State::Outside => {}
            State::InHeader => {
                if !block.description_closed && !trimmed.is_empty() && !trimmed.starts_with("####")
                {
                    block.description.push(trimmed.to_string());
                }
            }
            State::InUsage => {
                if !trimmed.is_empty() {
                    block.usage.push(trimmed.to_string());
                }
            }
            State::InParamDocs => {
                if let Some((param, doc)) = param_bullet(trimmed) {
                    block.param_docs.insert(param.to_string(), doc.to_string());
                } else if !trimmed.is_empty() {
                    if let Some((_, doc)) = block.param_docs.last_mut() {
                        if !doc.is_empty() {
                            doc.push(' ');
                        }
                        doc.push_str(trimmed);
                    }
                }
            }
            State::InExample => {
                if in_fence {
                    block.example.push(text.trim_end().to_string());
                }
            }
        }
    }
}

fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    let Some(body) = trimmed.strip_prefix("//") else {
        return LineKind::Code(trimmed);
    };

    let body_trimmed = body.trim();
    if body_trimmed.starts_with("===") {
        return LineKind::Rule;
    }
    if body_trimmed.starts_with("---") {
        let inner = body_trimmed.trim_matches('-').trim();
        if inner.is_empty() {
            return LineKind::Rule;
        }
        return match header_name(inner) {
            Some(name) => LineKind::Header(name),
            None => LineKind::UnrecognizedHeader(inner),
        };
    }

    LineKind::Comment(body.strip_prefix(' ').unwrap_or(body))
}

/// Extract the bare function name from header text such as
/// `` `(fi.)lowpass` ``, `` `fi.lowpass` `` or `lowpass`.
fn header_name(inner: &str) -> Option<&str> {
    let mut text = inner;
    if let Some(start) = text.find('`') {
        let rest = &text[start + 1..];
        let end = rest.find('`')?;
        text = &rest[..end];
    }
    let text = text.trim();
    let text = match text.strip_prefix('(') {
        Some(rest) => &rest[rest.find(')')? + 1..],
        None => text,
    };
    let name = text.rsplit('.').next().unwrap_or(text).trim();
    is_identifier(name).then_some(name)
}

fn section_state(trimmed: &str) -> Option<State> {
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("#### usage") || lower == "usage:" {
        Some(State::InUsage)
    } else if lower.starts_with("where:") || lower == "where" {
        Some(State::InParamDocs)
    } else if lower.starts_with("#### example") {
        Some(State::InExample)
    } else if lower.starts_with("####") {
        // Any other section (references, test programs, ...) ends the
        // description without being collected.
        Some(State::InHeader)
    } else {
        None
    }
}

/// Parse `* `N`: filter order` or `* N: filter order`.
fn param_bullet(trimmed: &str) -> Option<(&str, &str)> {
    let rest = trimmed
        .strip_prefix('*')
        .or_else(|| trimmed.strip_prefix('-'))?
        .trim_start();
    let (name, doc) = if let Some(quoted) = rest.strip_prefix('`') {
        let end = quoted.find('`')?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        let colon = rest.find(':')?;
        (&rest[..colon], &rest[colon..])
    };
    let doc = doc.trim_start().trim_start_matches(':').trim();
    let name = name.trim();
    (!name.is_empty()).then_some((name, doc))
}

/// Whether a code line defines `name`, as in `name(a,b) = ...` or `name = ...`.
fn defines(code: &str, name: &str) -> bool {
    code.strip_prefix(name)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|next| next == '(' || next == '=' || next.is_whitespace())
}

pub(crate) fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWPASS: &str = r#"//-----------------------`(fi.)lowpass`--------------------------
// Nth-order Butterworth lowpass filter.
// Uses a cascade of biquads.
//
// #### Usage
//
// ```
// _ : lowpass(N,fc) : _
// ```
//
// Where:
//
// * `N`: filter order (number of poles),
//   nonnegative constant
// * `fc`: cutoff frequency (Hz)
//
// #### Example test program
//
// ```
// process = fi.lowpass(3, 1000);
// ```
//
// #### References
//
// * <https://ccrma.stanford.edu/>
//-----------------------------------------------------------------
lowpass(N,fc) = lowpass0_highpass1(0,N,fc);
"#;

    fn parser_after(lines: &[&str]) -> DocBlockParser {
        let mut parser = DocBlockParser::new();
        for (index, line) in lines.iter().enumerate() {
            parser.feed(index + 1, line);
        }
        parser
    }

    #[test]
    fn test_outside_ignores_plain_comments() {
        let parser = parser_after(&["// just a comment", "import(\"stdfaust.lib\");"]);
        assert_eq!(parser.state(), State::Outside);
        let (blocks, skipped) = parser.finish();
        assert!(blocks.is_empty());
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_header_enters_in_header() {
        let parser = parser_after(&["//------`(fi.)lowpass`------", "// A filter."]);
        assert_eq!(parser.state(), State::InHeader);
    }

    #[test]
    fn test_usage_section_enters_in_usage() {
        let parser = parser_after(&["//------`(fi.)lowpass`------", "// #### Usage"]);
        assert_eq!(parser.state(), State::InUsage);
    }

    #[test]
    fn test_where_enters_in_param_docs() {
        let parser = parser_after(&["//------`lowpass`------", "// Where:"]);
        assert_eq!(parser.state(), State::InParamDocs);
    }

    #[test]
    fn test_example_section_enters_in_example() {
        let parser = parser_after(&["//------`lowpass`------", "// #### Example test program"]);
        assert_eq!(parser.state(), State::InExample);
    }

    #[test]
    fn test_rule_returns_outside() {
        let parser = parser_after(&["//------`lowpass`------", "// text", "//----------"]);
        assert_eq!(parser.state(), State::Outside);
    }

    #[test]
    fn test_full_block() {
        let (blocks, skipped) = DocBlockParser::parse(LOWPASS);
        assert!(skipped.is_empty());
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.name, "lowpass");
        assert_eq!(block.line, 1);
        assert_eq!(
            block.description,
            ["Nth-order Butterworth lowpass filter.", "Uses a cascade of biquads."]
        );
        assert_eq!(block.usage, ["_ : lowpass(N,fc) : _"]);
        assert_eq!(block.param_docs.len(), 2);
        assert_eq!(
            block.param_docs["N"],
            "filter order (number of poles), nonnegative constant"
        );
        assert_eq!(block.param_docs["fc"], "cutoff frequency (Hz)");
        assert_eq!(block.example, ["process = fi.lowpass(3, 1000);"]);
        assert_eq!(
            block.definition.as_deref(),
            Some("lowpass(N,fc) = lowpass0_highpass1(0,N,fc);")
        );
    }

    #[test]
    fn test_unrecognized_header_is_skipped() {
        let source = "//------------- Functions Reference -------------\n// text\n";
        let (blocks, skipped) = DocBlockParser::parse(source);
        assert!(blocks.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line, 1);
        assert_eq!(skipped[0].text, "Functions Reference");
    }

    #[test]
    fn test_consecutive_headers_yield_two_blocks() {
        let source = "//----`(os.)osc`----\n// Sine.\n//----`(os.)saw`----\n// Saw.\n";
        let (blocks, _) = DocBlockParser::parse(source);
        let names: Vec<_> = blocks.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["osc", "saw"]);
    }

    #[test]
    fn test_definition_must_match_name() {
        let source = "//----`(os.)osc`----\n// Sine.\n//--------\nother = 1;\n";
        let (blocks, _) = DocBlockParser::parse(source);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].definition.is_none());
    }

    #[test]
    fn test_header_name_forms() {
        assert_eq!(header_name("`(fi.)lowpass`"), Some("lowpass"));
        assert_eq!(header_name("`fi.lowpass`"), Some("lowpass"));
        assert_eq!(header_name("lowpass"), Some("lowpass"));
        assert_eq!(header_name("Functions Reference"), None);
        assert_eq!(header_name("`(fi.`"), None);
    }

    #[test]
    fn test_param_bullet_forms() {
        assert_eq!(param_bullet("* `N`: order"), Some(("N", "order")));
        assert_eq!(param_bullet("* fc: cutoff"), Some(("fc", "cutoff")));
        assert_eq!(param_bullet("- `x`"), Some(("x", "")));
        assert_eq!(param_bullet("not a bullet"), None);
    }
}
