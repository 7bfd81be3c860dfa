//! Signal and argument shapes from usage snippets.
//!
//! A usage snippet such as `_,_ : stereo(a,b) : _,_` documents a call:
//! placeholder signals (`_`) before the call are its inputs, those after it
//! are its outputs, and the parenthesised text lists its parameters.

use siglint_core::call_args::parse_call_args;

/// Arguments and signal counts of a library function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UsageShape {
    pub args: Vec<String>,
    pub inputs: usize,
    pub outputs: usize,
}

impl Default for UsageShape {
    fn default() -> Self {
        Self {
            args: Vec::new(),
            inputs: 0,
            outputs: 1,
        }
    }
}

/// Derive the shape of `name` from the first usage line that calls it.
///
/// Returns `None` if no line mentions `name` as a standalone identifier or
/// its argument list is unbalanced.
pub(crate) fn shape_from_usage(name: &str, usage: &[String]) -> Option<UsageShape> {
    usage.iter().find_map(|line| shape_from_line(name, line))
}

fn shape_from_line(name: &str, line: &str) -> Option<UsageShape> {
    let (call_start, name_end) = find_call(line, name)?;
    let after_name = &line[name_end..];
    let after_ws = after_name.trim_start();

    let (args, rest) = if after_ws.starts_with('(') {
        let call = parse_call_args(after_ws)?;
        let args = call.args().iter().map(|arg| arg.to_string()).collect();
        (args, &after_ws[call.consumed()..])
    } else {
        (Vec::new(), after_name)
    };

    let outputs = match count_placeholders(rest) {
        0 => 1,
        n => n,
    };
    Some(UsageShape {
        args,
        inputs: count_placeholders(&line[..call_start]),
        outputs,
    })
}

/// Parameter names from a raw definition line such as `lowpass(N,fc) = ...;`.
pub(crate) fn args_from_definition(name: &str, definition: &str) -> Option<Vec<String>> {
    let rest = definition.trim_start().strip_prefix(name)?.trim_start();
    if rest.starts_with('(') {
        let call = parse_call_args(rest)?;
        Some(call.args().iter().map(|arg| arg.to_string()).collect())
    } else if rest.starts_with('=') {
        Some(Vec::new())
    } else {
        None
    }
}

/// Locate `name` as a whole identifier, optionally qualified (`fi.name`).
///
/// Returns the byte offset where the (qualified) call starts and the offset
/// just past the name.
fn find_call(line: &str, name: &str) -> Option<(usize, usize)> {
    let bytes = line.as_bytes();
    let mut search_from = 0;
    while let Some(found) = line[search_from..].find(name) {
        let start = search_from + found;
        let end = start + name.len();
        search_from = end;

        let before_ok = start == 0 || !is_ident_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
        if !(before_ok && after_ok) {
            continue;
        }

        let mut call_start = start;
        if start > 0 && bytes[start - 1] == b'.' {
            call_start = start - 1;
            while call_start > 0 && is_ident_byte(bytes[call_start - 1]) {
                call_start -= 1;
            }
        }
        return Some((call_start, end));
    }
    None
}

/// Count standalone `_` tokens outside parentheses.
fn count_placeholders(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut count = 0;
    for (index, &byte) in bytes.iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b'_' if depth == 0 => {
                let before = index.checked_sub(1).map(|i| bytes[i]);
                let after = bytes.get(index + 1).copied();
                if !before.is_some_and(is_ident_byte) && !after.is_some_and(is_ident_byte) {
                    count += 1;
                }
            }
            _ => {}
        }
    }
    count
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}
