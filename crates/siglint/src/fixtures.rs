//! Shared catalog for unit tests.

use std::sync::Arc;

use indexmap::IndexMap;

use siglint_core::signature::{FunctionSignature, LibraryCatalog, LibraryInfo};

fn sig(prefix: &str, name: &str, args: &[&str]) -> FunctionSignature {
    FunctionSignature::new(
        prefix,
        name,
        args.iter().map(|arg| arg.to_string()).collect(),
        1,
        1,
    )
}

pub(crate) fn catalog() -> Arc<LibraryCatalog> {
    let functions = [
        sig("fi", "lowpass", &["N", "fc"]),
        sig("fi", "lowshelf", &["N", "L0", "fc"]),
        sig("fi", "highpass", &["N", "fc"]),
        sig("fi", "dcblocker", &[]),
        sig("os", "osc", &["freq"]),
        sig("os", "sawtooth", &["freq"]),
        sig("en", "adsr", &["at", "dt", "sl", "rt", "gate"]),
        sig("en", "ar", &["at", "rt", "gate"]),
        sig("de", "delay", &["n", "d"]),
        sig("de", "fdelay", &["n", "d"]),
        sig("ma", "PI", &[]),
        sig("ma", "EPSILON", &[]),
    ];

    let mut libraries = IndexMap::new();
    for (file, prefix) in [
        ("filters.lib", "fi"),
        ("oscillators.lib", "os"),
        ("envelopes.lib", "en"),
        ("delays.lib", "de"),
        ("maths.lib", "ma"),
    ] {
        let count = functions.iter().filter(|f| f.prefix() == prefix).count();
        libraries.insert(file.to_string(), LibraryInfo::new(file, prefix, count));
    }
    let functions = functions
        .into_iter()
        .map(|f| (f.full_name().to_string(), f))
        .collect();

    Arc::new(LibraryCatalog::from_parts("fixtures", libraries, functions))
}
