//! Checks that do not need the catalog's signatures: division safety,
//! oversized delays, missing imports and the entry point.

use log::trace;

use siglint_core::{
    call_args::parse_call_args,
    error::{Diagnostic, ErrorCode},
    signature::LibraryCatalog,
};

use crate::{
    config::RulesConfig,
    source::{Line, Source, is_ident_byte, qualified_refs},
};

/// One suggestion per line that divides by a non-literal without a guard.
pub(crate) fn unsafe_divisions(source: &Source, rules: &RulesConfig) -> Vec<String> {
    source
        .lines()
        .iter()
        .filter(|line| {
            !rules
                .guard_functions()
                .iter()
                .any(|guard| contains_word(&line.code, guard))
        })
        .filter_map(|line| {
            let divisor = line
                .code
                .match_indices('/')
                .find_map(|(index, _)| non_literal_divisor(&line.code[index + 1..]))?;
            trace!(line = line.number, divisor = divisor; "Unguarded division");
            Some(format!(
                "line {}: division by `{divisor}` may reach zero; guard it, e.g. `/ max(ma.EPSILON, {divisor})`",
                line.number
            ))
        })
        .collect()
}

/// The divisor following a `/`, unless it is a numeric literal.
fn non_literal_divisor(after: &str) -> Option<&str> {
    let text = after.trim_start();
    if text.starts_with('(') {
        let call = parse_call_args(text)?;
        let literal = call.len() == 1 && number_literal(call.args()[0]).is_some();
        return (!literal).then(|| &text[..call.consumed()]);
    }
    if leading_number(text).is_some() {
        return None;
    }
    let len = text
        .bytes()
        .position(|b| !(is_ident_byte(b) || b == b'.'))
        .unwrap_or(text.len());
    (len > 0).then(|| &text[..len])
}

/// Inline delay constants above the configured maximum: `@(N)`, `@ N` and
/// the first argument of `*.…delay(N, …)` calls.
pub(crate) fn oversized_delays(source: &Source, rules: &RulesConfig) -> Vec<Diagnostic> {
    let max = rules.max_delay() as f64;
    let mut diagnostics = Vec::new();
    for line in source.lines() {
        let mut found: Vec<(usize, f64)> = line
            .code
            .match_indices('@')
            .filter_map(|(index, _)| {
                let after = line.code[index + 1..].trim_start();
                let value = match parse_call_args(after) {
                    Some(call) if call.len() == 1 => number_literal(call.args()[0]),
                    Some(_) => None,
                    None => number_literal(after),
                };
                value.map(|value| (index, value))
            })
            .collect();

        found.extend(
            qualified_refs(&line.code)
                .into_iter()
                .filter(|reference| reference.name.ends_with("delay"))
                .filter_map(|reference| {
                    let call = parse_call_args(&line.code[reference.call_open?..])?;
                    let first = call.args().first()?;
                    number_literal(first).map(|value| (reference.start, value))
                }),
        );
        found.sort_by_key(|(index, _)| *index);

        diagnostics.extend(
            found
                .into_iter()
                .filter(|(_, value)| *value > max)
                .map(|(index, value)| oversized_delay(line, index, value, rules.max_delay())),
        );
    }
    diagnostics
}

fn oversized_delay(line: &Line, index: usize, value: f64, max: u64) -> Diagnostic {
    Diagnostic::from_code(
        ErrorCode::W202,
        format!("delay of {value} samples exceeds the {max}-sample limit"),
    )
    .at(line.number, line.column(index))
    .with_span(line.span(index, index + 1))
    .with_suggestion(format!(
        "use a delay of at most {max} samples, e.g. `de.delay({max}, n)` with a bounded `n`"
    ))
}

/// A `W201` at the first use of a catalogued library prefix, if the source
/// has no import directive at all.
pub(crate) fn missing_import(
    source: &Source,
    catalog: &LibraryCatalog,
    rules: &RulesConfig,
) -> Option<Diagnostic> {
    let imported = source.lines().iter().any(|line| {
        rules
            .import_directives()
            .iter()
            .any(|directive| contains_word(&line.code, directive))
    });
    if imported {
        return None;
    }

    source.lines().iter().find_map(|line| {
        let reference = qualified_refs(&line.code)
            .into_iter()
            .find(|reference| catalog.contains_prefix(reference.prefix))?;
        Some(
            Diagnostic::from_code(
                ErrorCode::W201,
                format!(
                    "library prefix `{}` is used but no library is imported",
                    reference.prefix
                ),
            )
            .at(line.number, line.column(reference.start))
            .with_span(line.span(reference.start, reference.start + reference.prefix.len()))
            .with_suggestion("add `import(\"stdfaust.lib\");` at the top of the file"),
        )
    })
}

/// An `E104` unless some top-level statement binds the entry point.
pub(crate) fn missing_entry_point(source: &Source, rules: &RulesConfig) -> Option<Diagnostic> {
    let entry = rules.entry_point();
    let defined = source
        .lines()
        .iter()
        .flat_map(Line::bindings)
        .any(|(depth, binding)| depth == 0 && binding.name == entry);
    (!defined).then(|| {
        Diagnostic::from_code(
            ErrorCode::E104,
            format!("missing entry point: no top-level `{entry}` definition"),
        )
        .with_suggestion(format!("define the program output, e.g. `{entry} = _;`"))
    })
}

/// The numeric literal at the start of `text`, whatever follows it, and the
/// text after it.
fn leading_number(text: &str) -> Option<(f64, &str)> {
    let text = text.trim_start();
    let len = text
        .bytes()
        .position(|b| !(b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E'))
        .unwrap_or(text.len());
    let token = &text[..len];
    if !token.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return None;
    }
    let value = token.parse().ok()?;
    Some((value, &text[len..]))
}

/// A numeric literal such as `48000`, `0.5` or `1e6` making up all of
/// `text` (ignoring surrounding whitespace and a trailing terminator).
fn number_literal(text: &str) -> Option<f64> {
    let (value, rest) = leading_number(text)?;
    let ends_expression = rest
        .trim_start()
        .bytes()
        .next()
        .is_none_or(|b| matches!(b, b';' | b')' | b',' | b':' | b'<' | b'>' | b'~'));
    ends_expression.then_some(value)
}

/// Whether `word` occurs in `code` not as part of a longer identifier.
fn contains_word(code: &str, word: &str) -> bool {
    let bytes = code.as_bytes();
    code.match_indices(word).any(|(index, _)| {
        let before = index == 0 || !is_ident_byte(bytes[index - 1]);
        let after = bytes
            .get(index + word.len())
            .is_none_or(|b| !is_ident_byte(*b));
        before && after
    })
}
