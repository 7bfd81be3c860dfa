//! Integration tests for the Validator API
//!
//! The library catalog is built from real library sources in a temporary
//! directory, written as an artifact and loaded back, the way the CLI uses
//! it.

use std::{fs, sync::Arc};

use proptest::prelude::*;
use tempfile::{TempDir, tempdir};

use siglint::{ErrorCode, LibraryCatalog, SiglintError, Validator, config::RulesConfig};
use siglint_catalog::{LibraryCatalogBuilder, artifact, curated_catalog};

const FILTERS: &str = r#"// Filters library. Its official prefix is `fi`.

//-----------------------`(fi.)lowpass`--------------------------
// Butterworth lowpass filter.
//
// #### Usage
//
// ```
// _ : lowpass(N,fc) : _
// ```
//
// Where:
//
// * `N`: order
// * `fc`: cutoff frequency
//-----------------------------------------------------------
lowpass(N,fc) = _;

//-----------------------`(fi.)highpass`--------------------------
// Butterworth highpass filter.
//
// #### Usage
//
// ```
// _ : highpass(N,fc) : _
// ```
//-----------------------------------------------------------
highpass(N,fc) = _;
"#;

const ENVELOPES: &str = r#"// Envelopes library. Its official prefix is `en`.

//-----------------------`(en.)adsr`--------------------------
// ADSR envelope.
//
// #### Usage
//
// ```
// adsr(at,dt,sl,rt,gate) : _
// ```
//-----------------------------------------------------------
adsr(at,dt,sl,rt,gate) = _;
"#;

struct Fixture {
    _dir: TempDir,
    validator: Validator,
}

fn fixture(rules: RulesConfig) -> Fixture {
    let dir = tempdir().expect("tempdir");
    let libraries = dir.path().join("libraries");
    fs::create_dir(&libraries).expect("mkdir");
    fs::write(libraries.join("filters.lib"), FILTERS).expect("write");
    fs::write(libraries.join("envelopes.lib"), ENVELOPES).expect("write");

    let build = LibraryCatalogBuilder::new().build(&libraries).expect("build catalog");
    let catalog_path = dir.path().join("out").join("catalog.json");
    artifact::write_catalog(&catalog_path, build.catalog()).expect("write catalog");

    let validator = Validator::from_artifacts(&catalog_path, None, rules).expect("load validator");
    Fixture {
        _dir: dir,
        validator,
    }
}

fn validator() -> Fixture {
    fixture(RulesConfig::default())
}

#[test]
fn test_catalogued_calls_with_correct_arity_check_clean() {
    let fixture = validator();
    let source = r#"import("stdfaust.lib");
gate = button("gate");
process = _ : fi.lowpass(2, 1000) : fi.highpass(1, 20) * en.adsr(0.01, 0.1, 0.8, 0.3, gate);
"#;
    assert_eq!(fixture.validator.checker().check(source), []);
    let result = fixture.validator.validate(source);
    assert!(result.is_valid());
    assert!(result.warnings().is_empty(), "{:?}", result.warnings());
}

#[test]
fn test_two_argument_function_called_with_one() {
    let fixture = validator();
    let diagnostics = fixture
        .validator
        .checker()
        .check("import(\"stdfaust.lib\");\nprocess = fi.lowpass(1000);");

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code(), Some(ErrorCode::E101));
    assert!(diagnostics[0].message().contains("fi.lowpass"));
    assert_eq!(diagnostics[0].line(), 2);
}

#[test]
fn test_self_referential_binding() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("import(\"stdfaust.lib\");\nenv = env.adsr(0.01, 0.1, 0.8, 0.3, 1);\nprocess = env;");

    let recursive: Vec<_> = result
        .errors()
        .iter()
        .filter(|d| d.code() == Some(ErrorCode::E102))
        .collect();
    assert_eq!(recursive.len(), 1);
    assert!(recursive[0].message().contains("`env`"));
    assert!(!result.is_valid());
}

#[test]
fn test_one_line_program_is_valid() {
    let fixture = validator();
    for source in [
        "import(\"stdfaust.lib\"); process = fi.lowpass(2, 1000);",
        "declare name \"x\"; process = _;",
    ] {
        let result = fixture.validator.validate(source);
        assert!(result.is_valid(), "{source}: {:?}", result.errors());
    }
}

#[test]
fn test_self_referential_binding_after_another_statement() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("g = 1; env = env.adsr(0.1, 0.1, 0.8, 0.3, 1);\nprocess = env;");

    let codes: Vec<_> = result.errors().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E102]);
}

#[test]
fn test_identifier_containing_directive_is_not_an_import() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("environment_gain = 0.5;\nprocess = fi.lowpass(2, 1000) * environment_gain;");

    assert!(result.is_valid());
    let codes: Vec<_> = result.warnings().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::W201]);
}

#[test]
fn test_missing_entry_point_is_fatal() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("import(\"stdfaust.lib\");\nfilter = fi.lowpass(2, 1000);");

    assert!(!result.is_valid());
    assert!(
        result
            .errors()
            .iter()
            .any(|d| d.code() == Some(ErrorCode::E104))
    );
}

#[test]
fn test_minimal_program_with_custom_entry_point() {
    let fixture = fixture(RulesConfig::default().with_entry_point("entry"));
    let result = fixture.validator.validate("entry = 1;");
    assert!(result.is_valid());
    assert!(result.warnings().is_empty());
    assert!(result.suggestions().is_empty());
}

#[test]
fn test_misspelled_function_is_suggested() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("import(\"stdfaust.lib\");\nprocess = fi.lowpas(2, 1000);");

    assert_eq!(result.errors().len(), 1);
    let error = &result.errors()[0];
    assert_eq!(error.code(), Some(ErrorCode::E100));
    assert!(error.suggestion().is_some_and(|s| s.contains("fi.lowpass")));
}

#[test]
fn test_translate_endless_evaluation() {
    let fixture = validator();
    let translated = fixture
        .validator
        .translate("ERROR : endless evaluation cycle of 4 steps");
    assert_eq!(translated.message(), "Endless evaluation cycle detected");
    assert!(translated.is_recognized());
}

#[test]
fn test_format_for_llm_includes_corrected_example() {
    let fixture = validator();
    let result = fixture
        .validator
        .validate("import(\"stdfaust.lib\");\nprocess = fi.lowpass(1000);");
    let report = fixture.validator.format_for_llm(&result);

    assert!(report.starts_with("VALIDATION FAILED: 1 error(s), 0 warning(s)\n"));
    assert!(report.contains("ERROR 1 (line 2, E101)"));
    assert!(report.contains("Suggestion: fi.lowpass(N, fc)"));
    assert!(report.contains("Corrected example:"));
    assert_eq!(report, fixture.validator.format_for_llm(&result));
}

#[test]
fn test_result_serializes() {
    let fixture = validator();
    let result = fixture.validator.validate("gain = 0.5;");
    let json = serde_json::to_value(&result).expect("json");
    assert_eq!(json["valid"], false);
    assert_eq!(json["errors"][0]["code"], "E104");
    assert_eq!(json["errors"][0]["severity"], "error");
}

#[test]
fn test_shared_validator_across_threads() {
    let fixture = validator();
    let validator = Arc::new(fixture.validator);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = Arc::clone(&validator);
            std::thread::spawn(move || {
                validator
                    .validate(&format!("process = fi.lowpass(2, {i});"))
                    .is_valid()
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().expect("thread"));
    }
}

#[test]
fn test_invalid_rules_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("catalog.json");
    artifact::write_catalog(&path, &LibraryCatalog::empty()).expect("write");

    let err = Validator::from_artifacts(&path, None, RulesConfig::default().with_entry_point("not valid"))
        .unwrap_err();
    assert!(matches!(err, SiglintError::InvalidRule { .. }));
}

#[test]
fn test_missing_artifact_is_catalog_error() {
    let dir = tempdir().expect("tempdir");
    let err = Validator::from_artifacts(dir.path().join("absent.json"), None, RulesConfig::default())
        .unwrap_err();
    assert!(matches!(err, SiglintError::Catalog(_)));
}

mod proptest_tests {
    use super::*;

    fn shared() -> Validator {
        Validator::new(
            Arc::new(LibraryCatalog::empty()),
            Arc::new(curated_catalog()),
            RulesConfig::default(),
        )
    }

    fn check_valid_matches_errors(source: &str) -> Result<(), TestCaseError> {
        let result = shared().validate(source);
        prop_assert_eq!(result.is_valid(), result.errors().is_empty());
        Ok(())
    }

    fn check_translate_keeps_original(text: &str) -> Result<(), TestCaseError> {
        let translated = shared().translate(text);
        prop_assert_eq!(translated.original(), text);
        if !translated.is_recognized() {
            prop_assert_eq!(translated.cause(), text);
        }
        prop_assert!(!shared().translate_all(text).is_empty());
        Ok(())
    }

    proptest! {
        #[test]
        fn valid_matches_errors(source in "[a-z_ =.;()\"/@0-9,\n{}*]{0,80}") {
            check_valid_matches_errors(&source)?;
        }

        #[test]
        fn translate_never_panics(text in "\\PC{0,120}") {
            check_translate_keeps_original(&text)?;
        }
    }
}
