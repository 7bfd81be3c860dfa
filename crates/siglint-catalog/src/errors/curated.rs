//! Curated error patterns.
//!
//! Order is part of the contract: the translator returns the first pattern
//! that matches, so specific patterns come before broader ones that can
//! overlap them (the composition errors all mention signal counts, an
//! endless evaluation is often reported alongside a stack overflow).

use siglint_core::error_catalog::ErrorPattern;

/// The curated patterns, in match order.
pub fn curated_patterns() -> Vec<ErrorPattern> {
    vec![
        ErrorPattern::new(
            "endless_evaluation",
            "endless evaluation|evaluation cycle",
            "Endless evaluation cycle detected",
            "A definition refers to itself without a delay, usually because a local \
             binding shadows a library prefix (for example `os = os.osc(440);`).",
            "Rename the local binding so it no longer shadows the library prefix, \
             or break the cycle with `~` and an explicit delay.",
        )
        .with_examples(
            "os = os.osc(440);\nprocess = os;",
            "tone = os.osc(440);\nprocess = tone;",
        ),
        ErrorPattern::new(
            "stack_overflow",
            "stack overflow|stack size|recursion depth",
            "Compiler stack overflow",
            "Unbounded recursion in a definition, typically a recursive pattern or \
             an iteration (`par`, `seq`, `sum`) with a huge or non-constant count.",
            "Check recursive definitions for a terminating case and keep iteration \
             counts small compile-time constants.",
        )
        .with_examples(
            "f(n) = f(n+1);\nprocess = f(0);",
            "f(0) = 0;\nf(n) = n + f(n-1);\nprocess = f(4);",
        ),
        ErrorPattern::new(
            "sequential_composition",
            "sequential composition",
            "Sequential composition A : B has mismatched signals",
            "The number of outputs of A is not equal to the number of inputs of B.",
            "Make A produce as many outputs as B takes inputs, for example by \
             inserting `<:` to duplicate or `:>` to mix signals.",
        )
        .with_examples(
            "process = os.osc(440) : fi.resonlp(1000, 5, 1) : _, _;",
            "process = os.osc(440) : fi.resonlp(1000, 5, 1) <: _, _;",
        ),
        ErrorPattern::new(
            "split_composition",
            "split composition",
            "Split composition A <: B has incompatible signals",
            "The number of inputs of B must be a multiple of the number of outputs of A.",
            "Adjust B so its input count is a multiple of A's outputs.",
        )
        .with_examples(
            "process = _, _ <: _, _, _;",
            "process = _, _ <: _, _, _, _;",
        ),
        ErrorPattern::new(
            "merge_composition",
            "merge composition",
            "Merge composition A :> B has incompatible signals",
            "The number of outputs of A must be a multiple of the number of inputs of B.",
            "Adjust A so its output count is a multiple of B's inputs.",
        )
        .with_examples("process = _, _, _ :> _, _;", "process = _, _, _, _ :> _, _;"),
        ErrorPattern::new(
            "recursive_composition",
            "recursive composition",
            "Recursive composition A ~ B has incompatible signals",
            "B needs no more inputs than A has outputs, and A at least as many \
             inputs as B has outputs.",
            "Make the feedback path B take and return a signal count that A can \
             route, usually `_` for a single feedback line.",
        )
        .with_examples("process = + ~ (_, _);", "process = + ~ _;"),
        ErrorPattern::new(
            "undefined_symbol",
            "undefined symbol|unknown identifier|undefined identifier",
            "Undefined symbol",
            "An identifier is used without being defined or imported.",
            "Check the spelling, define the symbol, or import the library that \
             provides it with `import(\"stdfaust.lib\");`.",
        )
        .with_examples(
            "process = osc(440);",
            "import(\"stdfaust.lib\");\nprocess = os.osc(440);",
        ),
        ErrorPattern::new(
            "unknown_function",
            "unknown function|no such function|function not found",
            "Unknown library function",
            "The function does not exist in the referenced library.",
            "Look the function up in the library documentation and use its exact name.",
        )
        .with_examples("process = os.oscillator(440);", "process = os.osc(440);"),
        ErrorPattern::new(
            "wrong_arg_count",
            "wrong number of arguments|number of arguments|too many arguments|not enough arguments",
            "Wrong number of arguments",
            "A function is called with a different number of arguments than it declares.",
            "Pass exactly the parameters listed in the function's usage.",
        )
        .with_examples(
            "process = fi.lowpass(1000);",
            "process = fi.lowpass(2, 1000);",
        ),
        ErrorPattern::new(
            "type_incompatibility",
            "incompatible type|type mismatch|type.*incompatib",
            "Incompatible signal types",
            "A signal of one type (int, float, UI element) is used where another is expected.",
            "Convert explicitly with `int(...)` or `float(...)`, and pass numbers \
             where constant parameters are required.",
        )
        .with_examples(
            "process = de.delay(48000, hslider(\"d\", 0.5, 0, 1, 0.01));",
            "process = de.delay(48000, int(hslider(\"d\", 0.5, 0, 1, 0.01) * 48000));",
        ),
        ErrorPattern::new(
            "division_by_zero",
            "division by zero|divide by zero|floating point exception",
            "Division by zero",
            "A divisor can reach zero, producing infinite or NaN samples.",
            "Guard the divisor, for example `x / max(ma.EPSILON, d)`.",
        )
        .with_examples(
            "gain = hslider(\"gain\", 0, 0, 1, 0.01);\nprocess = _ / gain;",
            "gain = hslider(\"gain\", 0, 0, 1, 0.01);\nprocess = _ / max(ma.EPSILON, gain);",
        ),
        ErrorPattern::new(
            "string_assignment",
            "string.*not allowed|string.*used as|string as a value|not a valid signal.*string",
            "String used as a value",
            "String literals are only valid in `declare` metadata and UI labels.",
            "Move the text into a `declare` statement or a UI label.",
        )
        .with_examples(
            "name = \"my synth\";\nprocess = _;",
            "declare name \"my synth\";\nprocess = _;",
        ),
        ErrorPattern::new(
            "file_not_found",
            "file not found|unable to open|can't open|cannot open|no such file",
            "Imported file not found",
            "An `import` or `library` directive names a file the compiler cannot locate.",
            "Check the file name and the library search path; the standard \
             libraries are imported with `import(\"stdfaust.lib\");`.",
        )
        .with_examples("import(\"stdfaus.lib\");", "import(\"stdfaust.lib\");"),
        ErrorPattern::new(
            "invalid_delay",
            "invalid delay|delay.*too large|delay.*negative|maximum delay|delay.*out of range",
            "Invalid delay length",
            "A delay length is negative, not bounded, or larger than the allowed maximum.",
            "Use a bounded, non-negative delay; size `de.delay` with a constant \
             maximum and clamp the variable length.",
        )
        .with_examples(
            "process = _ @ 10000000;",
            "process = de.delay(96000, min(96000, d));",
        ),
        ErrorPattern::new(
            "select2_both_branches",
            "select2.*both|both branches",
            "select2 evaluates both branches",
            "`select2` computes both of its inputs every sample; selecting away from \
             an unsafe branch does not stop it from producing NaN or infinity.",
            "Make each branch safe on its own, for example guard a division inside \
             the branch rather than relying on the selector.",
        )
        .with_examples(
            "process = select2(d == 0, 1 / d, 0);",
            "process = select2(d == 0, 1 / max(ma.EPSILON, d), 0);",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use siglint_core::error_catalog::ErrorCatalog;

    use super::*;

    fn first_match(text: &str) -> Option<String> {
        ErrorCatalog::new("curated", curated_patterns())
            .first_match(text)
            .map(|pattern| pattern.id().to_string())
    }

    #[test]
    fn test_ids_are_unique() {
        let patterns = curated_patterns();
        let ids: HashSet<_> = patterns.iter().map(ErrorPattern::id).collect();
        assert_eq!(ids.len(), patterns.len());
    }

    #[test]
    fn test_every_pattern_has_guidance_and_examples() {
        for pattern in curated_patterns() {
            assert!(!pattern.fix().is_empty(), "{} has no fix", pattern.id());
            assert!(pattern.example_bad().is_some(), "{} has no bad example", pattern.id());
            assert!(pattern.example_good().is_some(), "{} has no good example", pattern.id());
        }
    }

    #[test]
    fn test_known_compiler_messages() {
        let cases = [
            ("ERROR : endless evaluation cycle of 4 steps", "endless_evaluation"),
            (
                "ERROR : sequential composition A:B\nThe number of outputs (1) of A must be equal to the number of inputs (2) of B",
                "sequential_composition",
            ),
            ("ERROR : split composition A<:B", "split_composition"),
            ("ERROR : merge composition A:>B", "merge_composition"),
            ("ERROR : recursive composition A~B", "recursive_composition"),
            ("synth.dsp : 3 : ERROR : undefined symbol : oscc", "undefined_symbol"),
            ("ERROR : unable to open file stdfaus.lib", "file_not_found"),
            ("ERROR : wrong number of arguments for lowpass", "wrong_arg_count"),
            ("Floating point exception: division by zero", "division_by_zero"),
        ];
        for (text, id) in cases {
            assert_eq!(first_match(text).as_deref(), Some(id), "for {text:?}");
        }
    }

    #[test]
    fn test_unrelated_text_matches_nothing() {
        assert_eq!(first_match("everything compiled fine"), None);
    }
}
