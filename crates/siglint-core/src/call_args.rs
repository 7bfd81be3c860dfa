//! Parenthesised argument lists.
//!
//! Both the catalog builder (reading usage snippets such as
//! `_ : lowpass(N,fc) : _`) and the checker (counting arguments at call
//! sites) need to split `(a, f(b, c), "x,y")` into its top-level arguments.
//! Nesting is tracked so inner calls' commas are not counted, and commas
//! inside string literals are ignored. Unbalanced input yields `None` rather
//! than a guess.

use winnow::{
    Parser as _,
    combinator::{alt, delimited, repeat, separated},
    error::ModalResult,
    token::{none_of, take_while},
};

/// The top-level arguments of a call, as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgs<'src> {
    args: Vec<&'src str>,
    consumed: usize,
}

impl<'src> CallArgs<'src> {
    /// Trimmed argument texts; empty for `()`.
    pub fn args(&self) -> &[&'src str] {
        &self.args
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Bytes consumed from the input, including both parentheses.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Parse the argument list at the start of `text`, which must begin with `(`.
///
/// Returns `None` if `text` does not start with `(` or the parentheses are
/// unbalanced.
///
/// ```
/// # use siglint_core::call_args::parse_call_args;
/// let call = parse_call_args("(N, max(fc, 20), \"a,b\") : _").expect("balanced");
/// assert_eq!(call.args(), ["N", "max(fc, 20)", "\"a,b\""]);
/// assert!(parse_call_args("(N, fc").is_none());
/// ```
pub fn parse_call_args(text: &str) -> Option<CallArgs<'_>> {
    let mut input = text;
    let mut args = argument_list.parse_next(&mut input).ok()?;
    if args.len() == 1 && args[0].is_empty() {
        args.clear();
    }
    Some(CallArgs {
        args,
        consumed: text.len() - input.len(),
    })
}

fn argument_list<'src>(input: &mut &'src str) -> ModalResult<Vec<&'src str>> {
    delimited('(', separated(0.., argument, ','), ')').parse_next(input)
}

/// One argument: everything up to a top-level `,` or `)`.
fn argument<'src>(input: &mut &'src str) -> ModalResult<&'src str> {
    repeat::<_, _, (), _, _>(
        0..,
        alt((nested, string_literal, none_of(['(', ')', ',', '"']).void())),
    )
    .take()
    .map(str::trim)
    .parse_next(input)
}

/// A balanced parenthesised group, commas included.
fn nested(input: &mut &str) -> ModalResult<()> {
    delimited(
        '(',
        repeat::<_, _, (), _, _>(
            0..,
            alt((nested, string_literal, none_of(['(', ')', '"']).void())),
        ),
        ')',
    )
    .parse_next(input)
}

fn string_literal(input: &mut &str) -> ModalResult<()> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"')
        .void()
        .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_argument_list() {
        let call = parse_call_args("()").expect("balanced");
        assert!(call.is_empty());
        assert_eq!(call.consumed(), 2);
    }

    #[test]
    fn test_simple_arguments_are_trimmed() {
        let call = parse_call_args("( N ,fc )").expect("balanced");
        assert_eq!(call.args(), ["N", "fc"]);
    }

    #[test]
    fn test_nested_commas_are_not_counted() {
        let call = parse_call_args("(3, fi.lowpass(2, 1000), ba.sec2samp(0.5))").expect("balanced");
        assert_eq!(call.len(), 3);
        assert_eq!(call.args()[1], "fi.lowpass(2, 1000)");
    }

    #[test]
    fn test_commas_in_strings_are_not_counted() {
        let call = parse_call_args("(\"gain [unit:dB], left\", 0, -70, 10, 0.1)").expect("balanced");
        assert_eq!(call.len(), 5);
    }

    #[test]
    fn test_consumed_stops_at_matching_paren() {
        let text = "(freq) : _";
        let call = parse_call_args(text).expect("balanced");
        assert_eq!(&text[call.consumed()..], " : _");
    }

    #[test]
    fn test_unbalanced_input_is_rejected() {
        assert!(parse_call_args("(a, (b, c)").is_none());
        assert!(parse_call_args("(\"open, 1)").is_none());
        assert!(parse_call_args("a, b)").is_none());
        assert!(parse_call_args("").is_none());
    }
}
