//! Catalog-driven checks over DSL source.
//!
//! [`SyntaxChecker`] holds an immutable [`LibraryCatalog`] and reports, per
//! line of comment-free code:
//!
//! - calls through an unknown short prefix (`W200`),
//! - calls to functions missing from a known library (`E100`),
//! - calls with the wrong number of arguments (`E101`),
//! - `name = name.` bindings that evaluate themselves forever (`E102`),
//! - string literals bound as values (`E103`).

use std::{collections::HashSet, sync::Arc};

use log::{debug, trace};

use siglint_core::{
    call_args::parse_call_args,
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    signature::LibraryCatalog,
};

use crate::{
    config::RulesConfig,
    source::{
        Binding, Line, QualifiedRef, Source, identifier_len, is_ident_byte, qualified_refs,
    },
};

/// Validates DSL source against a function-signature catalog.
///
/// The checker keeps no state between calls, so one instance can be shared
/// across threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use siglint::{SyntaxChecker, config::RulesConfig};
/// use siglint_core::signature::LibraryCatalog;
///
/// let checker = SyntaxChecker::new(Arc::new(LibraryCatalog::empty()), RulesConfig::default());
/// assert!(checker.check("process = _;").is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct SyntaxChecker {
    catalog: Arc<LibraryCatalog>,
    rules: RulesConfig,
}

impl SyntaxChecker {
    pub fn new(catalog: Arc<LibraryCatalog>, rules: RulesConfig) -> Self {
        Self { catalog, rules }
    }

    pub fn catalog(&self) -> &LibraryCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Check `source`, returning diagnostics in source order.
    pub fn check(&self, source: &str) -> Vec<Diagnostic> {
        self.check_source(&Source::parse(source)).finish()
    }

    pub(crate) fn check_source(&self, source: &Source) -> DiagnosticCollector {
        let locals = local_prefixes(source);
        let mut collector = DiagnosticCollector::new();
        for line in source.lines() {
            self.check_line(line, &locals, &mut collector);
        }
        debug!(
            lines = source.lines().len(),
            diagnostics = collector.len(),
            has_errors = collector.has_errors();
            "Source checked"
        );
        collector
    }

    fn check_line(&self, line: &Line, locals: &HashSet<&str>, collector: &mut DiagnosticCollector) {
        let mut recursive = Vec::new();
        for (_, binding) in line.bindings() {
            if is_self_reference(&binding) {
                collector.emit(recursive_definition(line, &binding));
                recursive.push(binding.name);
            }
            if let Some(diagnostic) = string_assignment(line, &binding) {
                collector.emit(diagnostic);
            }
        }

        for reference in qualified_refs(&line.code) {
            let Some(open) = reference.call_open else {
                continue;
            };
            if locals.contains(reference.prefix) {
                continue;
            }
            if !self.catalog.contains_prefix(reference.prefix) {
                let shadowed = recursive.contains(&reference.prefix);
                if !shadowed && reference.prefix.len() <= self.rules.unknown_prefix_max_len() {
                    collector.emit(self.unknown_prefix(line, &reference));
                }
                continue;
            }

            let full_name = reference.full_name();
            let Some(signature) = self.catalog.get(&full_name) else {
                collector.emit(self.unknown_function(line, &reference, &full_name));
                continue;
            };
            if signature.arg_count() == 0 {
                continue;
            }
            let Some(call) = parse_call_args(&line.code[open..]) else {
                trace!(line = line.number, function = full_name.as_str(); "Unbalanced call, arity not checked");
                continue;
            };
            if call.len() != signature.arg_count() {
                let message = format!(
                    "`{full_name}` expects {} argument(s) ({}) but got {}",
                    signature.arg_count(),
                    signature.args().join(", "),
                    call.len()
                );
                collector.emit(
                    Diagnostic::from_code(ErrorCode::E101, message)
                        .at(line.number, line.column(reference.start))
                        .with_span(line.span(reference.start, open + call.consumed()))
                        .with_suggestion(signature.call_form()),
                );
            }
        }
    }

    fn unknown_prefix(&self, line: &Line, reference: &QualifiedRef<'_>) -> Diagnostic {
        let prefixes = self.catalog.prefixes();
        let diagnostic = Diagnostic::from_code(
            ErrorCode::W200,
            format!("unknown library prefix `{}`", reference.prefix),
        )
        .at(line.number, line.column(reference.start))
        .with_span(line.span(reference.start, reference.start + reference.prefix.len()));
        if prefixes.is_empty() {
            diagnostic
        } else {
            diagnostic.with_suggestion(format!("known prefixes: {}", prefixes.join(", ")))
        }
    }

    fn unknown_function(&self, line: &Line, reference: &QualifiedRef<'_>, full_name: &str) -> Diagnostic {
        let candidates = self.catalog.suggestions(
            reference.prefix,
            reference.name,
            self.rules.max_suggestions(),
        );
        let suggestion = if candidates.is_empty() {
            format!(
                "no function named `{}` in the `{}` library; check its documentation",
                reference.name, reference.prefix
            )
        } else {
            let quoted: Vec<String> = candidates.iter().map(|name| format!("`{name}`")).collect();
            format!("did you mean {}?", quoted.join(", "))
        };
        Diagnostic::from_code(ErrorCode::E100, format!("unknown function `{full_name}`"))
            .at(line.number, line.column(reference.start))
            .with_span(line.span(reference.start, reference.end))
            .with_suggestion(suggestion)
    }
}

/// Prefixes bound locally with `name = library("...")` or
/// `name = environment { ... }`.
fn local_prefixes(source: &Source) -> HashSet<&str> {
    source
        .lines()
        .iter()
        .flat_map(Line::bindings)
        .map(|(_, binding)| binding)
        .filter(|binding| starts_with_word(binding.rhs, "library") || starts_with_word(binding.rhs, "environment"))
        .map(|binding| binding.name)
        .collect()
}

fn starts_with_word(text: &str, word: &str) -> bool {
    text.strip_prefix(word)
        .is_some_and(|rest| !rest.bytes().next().is_some_and(is_ident_byte))
}

/// `name = name.something`
fn is_self_reference(binding: &Binding<'_>) -> bool {
    binding
        .rhs
        .strip_prefix(binding.name)
        .and_then(|rest| rest.strip_prefix('.'))
        .is_some_and(|rest| identifier_len(rest) > 0)
}

fn recursive_definition(line: &Line, binding: &Binding<'_>) -> Diagnostic {
    let name = binding.name;
    Diagnostic::from_code(
        ErrorCode::E102,
        format!("`{name}` is defined in terms of itself (`{name} = {name}.`), causing endless evaluation"),
    )
    .at(line.number, line.column(binding.name_start))
    .with_span(line.span(binding.name_start, binding.name_start + name.len()))
    .with_suggestion(format!(
        "rename the binding, e.g. `my_{name} = {name}...`, so it does not shadow the `{name}` library"
    ))
}

/// A binding whose whole right-hand side is a string literal.
fn string_assignment(line: &Line, binding: &Binding<'_>) -> Option<Diagnostic> {
    let literal = binding.rhs.strip_prefix('"')?;
    let close = literal.find('"')?;
    let rest = literal[close + 1..].trim();
    if !(rest.is_empty() || rest == ";") {
        return None;
    }
    let end = binding.rhs_start + close + 2;
    Some(
        Diagnostic::from_code(
            ErrorCode::E103,
            format!("string literal assigned to `{}`; strings are only valid as metadata or UI labels", binding.name),
        )
        .at(line.number, line.column(binding.rhs_start))
        .with_span(line.span(binding.rhs_start, end))
        .with_suggestion(format!("use `declare {} \"...\";` for metadata", binding.name)),
    )
}
