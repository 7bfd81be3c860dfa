use std::fs;

use proptest::prelude::*;
use tempfile::{TempDir, tempdir};

use siglint_catalog::{CatalogError, LibraryCatalogBuilder, artifact};

const OSCILLATORS: &str = r#"// Oscillators library. Its official prefix is `os`.

//-----------------------`(os.)osc`--------------------------
// Sine oscillator.
//
// #### Usage
//
// ```
// osc(freq) : _
// ```
//
// Where:
//
// * `freq`: frequency in Hz
//-----------------------------------------------------------
osc(freq) = sin(2 * ma.PI * phasor(freq));

//-----------------------`(os.)sawtooth`--------------------------
// Band-limited sawtooth.
//
// #### Usage
//
// ```
// sawtooth(freq) : _
// ```
//-----------------------------------------------------------
sawtooth(freq) = _;
"#;

const FILTERS: &str = r#"// Filters library. Its official prefix is `fi`.

//-----------------------`(fi.)lowpass`--------------------------
// Butterworth lowpass.
//
// #### Usage
//
// ```
// _ : lowpass(N,fc) : _
// ```
//-----------------------------------------------------------
lowpass(N,fc) = _;

//---------------------------------------------------------------
//---------------- Functions Reference ------------------------
//---------------------------------------------------------------
"#;

fn library_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempdir().expect("tempdir");
    for (name, content) in files {
        fs::write(dir.path().join(name), content).expect("write library");
    }
    dir
}

#[test]
fn test_keys_are_prefixed_and_prefixes_are_declared() {
    let dir = library_dir(&[("oscillators.lib", OSCILLATORS), ("filters.lib", FILTERS)]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");
    let catalog = build.catalog();

    assert_eq!(catalog.functions().len(), 3);
    for (key, signature) in catalog.functions() {
        assert_eq!(key, &format!("{}.{}", signature.prefix(), signature.name()));
        assert!(
            catalog.contains_prefix(signature.prefix()),
            "{key} has an undeclared prefix"
        );
    }
    assert_eq!(catalog.prefixes(), ["fi", "os"]);
}

#[test]
fn test_unrecognized_header_is_reported_not_fatal() {
    let dir = library_dir(&[("filters.lib", FILTERS)]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");

    assert!(build.catalog().get("fi.lowpass").is_some());
    assert!(
        build
            .warnings()
            .iter()
            .any(|warning| warning.message().contains("Functions Reference")),
        "warnings: {:?}",
        build.warnings()
    );
}

#[test]
fn test_file_without_prefix_is_skipped() {
    let dir = library_dir(&[
        ("filters.lib", FILTERS),
        ("mystery.lib", "//----`thing`----\n// A thing.\nthing = 1;\n"),
    ]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");

    assert_eq!(build.catalog().functions().len(), 1);
    assert!(build.warnings().iter().any(|w| w.file() == "mystery.lib"));
}

#[test]
fn test_alias_declaration_supplies_prefix() {
    let dir = library_dir(&[
        ("all.lib", "fi = library(\"plain.lib\");\n"),
        ("plain.lib", "//----`(fi.)notch`----\n// Notch filter.\nnotch(f) = _;\n"),
    ]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");

    let notch = build.catalog().get("fi.notch").expect("aliased function");
    assert_eq!(notch.args(), ["f"]);
}

#[test]
fn test_duplicate_definition_last_file_wins_with_warning() {
    let dir = library_dir(&[
        ("a_first.lib", "// prefix: fi\n//----`twin`----\n// First.\ntwin(a) = _;\n"),
        ("b_second.lib", "// prefix: fi\n//----`twin`----\n// Second.\ntwin(a,b) = _;\n"),
    ]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");

    let twin = build.catalog().get("fi.twin").expect("twin");
    assert_eq!(twin.description(), "Second.");
    assert_eq!(twin.arg_count(), 2);

    let duplicate = build
        .warnings()
        .iter()
        .find(|w| w.message().contains("fi.twin"))
        .expect("duplicate warning");
    assert!(duplicate.message().contains("a_first.lib"));
    assert_eq!(duplicate.file(), "b_second.lib");
}

#[test]
fn test_description_is_truncated() {
    let long = "word ".repeat(100);
    let content = format!("// prefix: xx\n//----`long`----\n// {long}\nlong = 1;\n");
    let dir = library_dir(&[("long.lib", content.as_str())]);
    let build = LibraryCatalogBuilder::new()
        .with_description_limit(20)
        .build(dir.path())
        .expect("build");

    let description = build.catalog().get("xx.long").expect("long").description();
    assert!(description.chars().count() <= 20, "{description:?}");
}

#[test]
fn test_missing_directory_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let err = LibraryCatalogBuilder::new()
        .build(dir.path().join("absent"))
        .unwrap_err();
    assert!(matches!(err, CatalogError::MissingDirectory(_)));
}

#[test]
fn test_artifact_round_trip_preserves_catalog() {
    let dir = library_dir(&[("oscillators.lib", OSCILLATORS)]);
    let build = LibraryCatalogBuilder::new().build(dir.path()).expect("build");
    let out = tempdir().expect("tempdir");
    let path = out.path().join("catalog.json");

    artifact::write_catalog(&path, build.catalog()).expect("write");
    let loaded = artifact::read_catalog(&path).expect("read");

    assert_eq!(&loaded, build.catalog());
    let json = fs::read_to_string(&path).expect("json");
    assert!(json.contains("\"fullName\": \"os.osc\""));
    assert!(json.contains("\"argCount\": 1"));
}

mod proptest_tests {
    use super::*;

    fn library_source(names: &[String]) -> String {
        let mut source = String::from("// prefix: pp\n");
        for (index, name) in names.iter().enumerate() {
            let args: Vec<String> = (0..index % 3).map(|i| format!("a{i}")).collect();
            source.push_str(&format!(
                "//----`(pp.){name}`----\n// Function {name}.\n//\n// #### Usage\n//\n// ```\n// _ : {name}({}) : _\n// ```\n//----\n{name} = _;\n\n",
                args.join(",")
            ));
        }
        source
    }

    fn check_build_is_deterministic(names: Vec<String>) -> Result<(), TestCaseError> {
        let source = library_source(&names);
        let dir = library_dir(&[("p.lib", source.as_str())]);
        let builder = LibraryCatalogBuilder::new();
        let first = builder.build(dir.path()).expect("first build");
        let second = builder.build(dir.path()).expect("second build");
        prop_assert_eq!(first.catalog(), second.catalog());
        for key in first.catalog().functions().keys() {
            prop_assert!(key.starts_with("pp."));
        }
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn build_is_deterministic(names in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 0..6)) {
            check_build_is_deterministic(names)?;
        }
    }
}
