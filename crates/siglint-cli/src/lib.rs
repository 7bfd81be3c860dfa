//! CLI logic for the siglint tool.
//!
//! [`run`] dispatches a parsed [`Args`] to one of the subcommands and writes
//! their output to the given writer. Problems found in checked source are
//! not errors: they make [`run`] return [`Outcome::Failure`].

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, Format};

use std::{
    fs,
    io::{self, Write},
    path::Path,
    sync::Arc,
};

use log::{info, warn};

use siglint::{
    ErrorTranslator, FunctionSignature, LibraryCatalog, SiglintError, TranslatedError, Validator,
    config::AppConfig,
};
use siglint_catalog::{ErrorCatalogBuilder, LibraryCatalogBuilder, artifact, curated_catalog};

use error_adapter::{diagnostics_to_reportables, render};

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// The source is invalid, or a lookup found nothing.
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }
}

/// Run the siglint CLI application
///
/// # Errors
///
/// Returns `SiglintError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Missing, unreadable or outdated catalog artifacts
pub fn run(args: &Args, out: &mut dyn Write) -> Result<Outcome, SiglintError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::BuildCatalog {
            library_dir,
            output,
        } => build_catalog(library_dir, output, out),
        Command::BuildErrorCatalog {
            compiler_source_dir,
            output,
        } => build_error_catalog(compiler_source_dir.as_deref(), output, out),
        Command::Validate {
            input,
            catalog,
            format,
        } => {
            let catalog = config::catalog_path(catalog.as_deref(), &app_config)?;
            validate(input, &catalog, *format, &app_config, out)
        }
        Command::Translate { input } => translate(input.as_deref(), &app_config, out),
        Command::Lookup { name, catalog } => {
            let catalog = config::catalog_path(catalog.as_deref(), &app_config)?;
            lookup(name, &catalog, out)
        }
    }
}

fn build_catalog(library_dir: &str, output: &str, out: &mut dyn Write) -> Result<Outcome, SiglintError> {
    info!(library_dir, output; "Building library catalog");

    let build = LibraryCatalogBuilder::new().build(library_dir)?;
    for warning in build.warnings() {
        warn!(warning:% = warning; "Library catalog warning");
    }
    artifact::write_catalog(output, build.catalog())?;

    writeln!(
        out,
        "Wrote {} functions from {} libraries to {output} ({} warning(s))",
        build.catalog().functions().len(),
        build.catalog().libraries().len(),
        build.warnings().len()
    )?;
    Ok(Outcome::Success)
}

fn build_error_catalog(
    compiler_source_dir: Option<&str>,
    output: &str,
    out: &mut dyn Write,
) -> Result<Outcome, SiglintError> {
    info!(compiler_source_dir:?, output; "Building error catalog");

    let build = ErrorCatalogBuilder::new().build(compiler_source_dir.map(Path::new))?;
    for warning in build.warnings() {
        warn!(warning:% = warning; "Error catalog warning");
    }
    artifact::write_error_catalog(output, build.catalog())?;

    writeln!(
        out,
        "Wrote {} patterns and {} raw errors to {output}",
        build.catalog().len(),
        build.catalog().raw_errors().len()
    )?;
    Ok(Outcome::Success)
}

fn validate(
    input: &str,
    catalog: &Path,
    format: Format,
    app_config: &AppConfig,
    out: &mut dyn Write,
) -> Result<Outcome, SiglintError> {
    info!(input, catalog = catalog.display().to_string(); "Validating source");

    let validator = Validator::from_artifacts(
        catalog,
        app_config.catalog().error_path(),
        app_config.rules().clone(),
    )?;
    let source = fs::read_to_string(input)?;
    let result = validator.validate(&source);

    match format {
        Format::Text => {
            let diagnostics = result.errors().iter().chain(result.warnings());
            for reportable in diagnostics_to_reportables(diagnostics, &source) {
                write!(out, "{}", render(&reportable))?;
            }
            for suggestion in result.suggestions() {
                writeln!(out, "suggestion: {suggestion}")?;
            }
            if result.is_valid() {
                writeln!(out, "{input}: valid, {} warning(s)", result.warnings().len())?;
            } else {
                writeln!(
                    out,
                    "{input}: invalid, {} error(s), {} warning(s)",
                    result.errors().len(),
                    result.warnings().len()
                )?;
            }
        }
        Format::Llm => write!(out, "{}", validator.format_for_llm(&result))?,
        Format::Json => writeln!(out, "{}", result.to_json()?)?,
    }

    Ok(if result.is_valid() {
        Outcome::Success
    } else {
        Outcome::Failure
    })
}

fn translate(input: Option<&str>, app_config: &AppConfig, out: &mut dyn Write) -> Result<Outcome, SiglintError> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => io::read_to_string(io::stdin())?,
    };
    let catalog = match app_config.catalog().error_path() {
        Some(path) => artifact::read_error_catalog(path)?,
        None => curated_catalog(),
    };

    let translator = ErrorTranslator::new(Arc::new(catalog));
    for (index, translated) in translator.translate_all(&text).iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        write_translation(out, translated)?;
    }
    Ok(Outcome::Success)
}

fn write_translation(out: &mut dyn Write, translated: &TranslatedError) -> io::Result<()> {
    write!(out, "{}", translated.message())?;
    if let Some(line) = translated.line() {
        write!(out, " (line {line})")?;
    }
    match translated.pattern_id() {
        Some(id) => writeln!(out, " [{id}]")?,
        None => writeln!(out)?,
    }
    writeln!(out, "  cause: {}", translated.cause())?;
    writeln!(out, "  fix: {}", translated.fix())?;
    for (label, example) in [
        ("before", translated.example_bad()),
        ("after", translated.example_good()),
    ] {
        if let Some(example) = example {
            writeln!(out, "  {label}:")?;
            for line in example.lines() {
                writeln!(out, "    {line}")?;
            }
        }
    }
    Ok(())
}

fn lookup(name: &str, catalog: &Path, out: &mut dyn Write) -> Result<Outcome, SiglintError> {
    let catalog = artifact::read_catalog(catalog)?;

    if let Some(signature) = catalog.get(name) {
        write_signature(out, signature)?;
        return Ok(Outcome::Success);
    }
    if catalog.contains_prefix(name) {
        for signature in catalog.functions_in(name) {
            let summary = signature.description().split(". ").next().unwrap_or_default();
            writeln!(out, "{}  {summary}", signature.call_form())?;
        }
        return Ok(Outcome::Success);
    }

    writeln!(out, "no function or library named `{name}`")?;
    let candidates = close_names(&catalog, name);
    if !candidates.is_empty() {
        writeln!(out, "did you mean: {}", candidates.join(", "))?;
    }
    Ok(Outcome::Failure)
}

fn close_names(catalog: &LibraryCatalog, name: &str) -> Vec<String> {
    match name.split_once('.') {
        Some((prefix, function)) => catalog.suggestions(prefix, function, 5),
        None => Vec::new(),
    }
}

fn write_signature(out: &mut dyn Write, signature: &FunctionSignature) -> io::Result<()> {
    writeln!(out, "{}", signature.call_form())?;
    writeln!(
        out,
        "  inputs: {}, outputs: {}",
        signature.inputs(),
        signature.outputs()
    )?;
    if !signature.description().is_empty() {
        writeln!(out, "\n{}", signature.description())?;
    }
    if !signature.param_docs().is_empty() {
        writeln!(out, "\nParameters:")?;
        for (param, doc) in signature.param_docs() {
            writeln!(out, "  {param}: {doc}")?;
        }
    }
    if !signature.example().is_empty() {
        writeln!(out, "\nExample:")?;
        for line in signature.example().lines() {
            writeln!(out, "  {line}")?;
        }
    }
    Ok(())
}
