//! Directory-level catalog build.

use std::{collections::HashMap, fs, path::Path};

use indexmap::IndexMap;
use log::{debug, info, warn};
use walkdir::WalkDir;

use siglint_core::signature::{FunctionSignature, LibraryCatalog, LibraryInfo};

use super::{
    doc_block::{DocBlock, DocBlockParser, is_identifier},
    usage::{UsageShape, args_from_definition, shape_from_usage},
};
use crate::{CatalogError, CatalogWarning};

const DEFAULT_DESCRIPTION_LIMIT: usize = 300;
const DEFAULT_EXAMPLE_LIMIT: usize = 500;

/// Builds a [`LibraryCatalog`] from a directory of library sources.
///
/// Files are visited in file-name order so repeated builds over the same
/// input produce identical catalogs. When two files define the same
/// `prefix.name`, the file visited last wins and a [`CatalogWarning`] names
/// both files.
///
/// # Examples
///
/// ```no_run
/// use siglint_catalog::LibraryCatalogBuilder;
///
/// let build = LibraryCatalogBuilder::new()
///     .with_description_limit(200)
///     .build("/usr/share/faust")
///     .expect("library directory exists");
/// println!("{} functions", build.catalog().functions().len());
/// ```
#[derive(Debug, Clone)]
pub struct LibraryCatalogBuilder {
    description_limit: usize,
    example_limit: usize,
    extension: String,
}

impl Default for LibraryCatalogBuilder {
    fn default() -> Self {
        Self {
            description_limit: DEFAULT_DESCRIPTION_LIMIT,
            example_limit: DEFAULT_EXAMPLE_LIMIT,
            extension: "lib".to_string(),
        }
    }
}

/// Result of a directory build: the catalog and everything that was skipped.
#[derive(Debug, Clone)]
pub struct CatalogBuild {
    catalog: LibraryCatalog,
    warnings: Vec<CatalogWarning>,
}

impl CatalogBuild {
    pub fn catalog(&self) -> &LibraryCatalog {
        &self.catalog
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn into_catalog(self) -> LibraryCatalog {
        self.catalog
    }
}

/// Functions parsed from a single library file.
#[derive(Debug, Clone)]
pub struct LibraryParse {
    prefix: String,
    functions: Vec<FunctionSignature>,
    warnings: Vec<CatalogWarning>,
}

impl LibraryParse {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn functions(&self) -> &[FunctionSignature] {
        &self.functions
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }
}

impl LibraryCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum stored description length, in characters.
    pub fn with_description_limit(mut self, limit: usize) -> Self {
        self.description_limit = limit;
        self
    }

    /// Maximum stored example length, in characters.
    pub fn with_example_limit(mut self, limit: usize) -> Self {
        self.example_limit = limit;
        self
    }

    /// File extension of library sources (default `lib`).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Build the catalog from every library file under `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingDirectory`] if `dir` is not a
    /// directory. Unreadable or malformed files are skipped and reported in
    /// [`CatalogBuild::warnings`].
    pub fn build(&self, dir: impl AsRef<Path>) -> Result<CatalogBuild, CatalogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
        }
        info!(dir = dir.display().to_string(); "Building library catalog");

        let mut warnings = Vec::new();
        let mut sources = Vec::new();
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|ext| ext != self.extension.as_str()) {
                continue;
            }
            let file = relative_name(dir, path);
            match fs::read_to_string(path) {
                Ok(content) => sources.push((file, content)),
                Err(err) => {
                    warn!(file = file.as_str(), err:% = err; "Skipping unreadable library file");
                    warnings.push(CatalogWarning::new(file, None, format!("unreadable: {err}")));
                }
            }
        }

        let aliases: HashMap<String, String> = sources
            .iter()
            .flat_map(|(_, content)| library_aliases(content))
            .collect();

        let mut libraries = IndexMap::new();
        let mut functions: IndexMap<String, FunctionSignature> = IndexMap::new();
        let mut origins: HashMap<String, String> = HashMap::new();

        for (file, content) in &sources {
            let parsed = match self.parse_library(file, content, &aliases) {
                Ok(parsed) => parsed,
                Err(warning) => {
                    warn!(file = file.as_str(), reason = warning.message(); "Skipping library file");
                    warnings.push(warning);
                    continue;
                }
            };
            if parsed.functions.is_empty() {
                debug!(file = file.as_str(); "No documented functions, library skipped");
                warnings.extend(parsed.warnings);
                continue;
            }
            debug!(
                file = file.as_str(),
                prefix = parsed.prefix.as_str(),
                functions = parsed.functions.len();
                "Library parsed"
            );

            libraries.insert(
                file.clone(),
                LibraryInfo::new(file.clone(), parsed.prefix.clone(), parsed.functions.len()),
            );
            warnings.extend(parsed.warnings);
            for signature in parsed.functions {
                let full_name = signature.full_name().to_string();
                if let Some(previous) = origins.insert(full_name.clone(), file.clone()) {
                    let message = format!(
                        "`{full_name}` is also defined in {previous}; the definition in {file} replaces it"
                    );
                    warn!(
                        function = full_name.as_str(),
                        previous = previous.as_str(),
                        file = file.as_str();
                        "Duplicate function definition"
                    );
                    warnings.push(CatalogWarning::new(file.clone(), None, message));
                }
                functions.insert(full_name, signature);
            }
        }

        info!(
            libraries = libraries.len(),
            functions = functions.len(),
            warnings = warnings.len();
            "Library catalog built"
        );

        Ok(CatalogBuild {
            catalog: LibraryCatalog::from_parts(dir.display().to_string(), libraries, functions),
            warnings,
        })
    }

    /// Parse one library file.
    ///
    /// `aliases` maps library file names to prefixes declared elsewhere
    /// (`fi = library("filters.lib");`); it is consulted when the file
    /// itself declares no prefix.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogWarning`] if the file documents functions but no
    /// prefix can be determined for it; the caller skips the file.
    pub fn parse_library(
        &self,
        file: &str,
        content: &str,
        aliases: &HashMap<String, String>,
    ) -> Result<LibraryParse, CatalogWarning> {
        let file_name = file.rsplit('/').next().unwrap_or(file);
        let (blocks, skipped) = DocBlockParser::parse(content);
        let prefix = match declared_prefix(content)
            .map(str::to_string)
            .or_else(|| aliases.get(file_name).cloned())
        {
            Some(prefix) => prefix,
            // Nothing documented, e.g. a file that only declares aliases.
            None if blocks.is_empty() => String::new(),
            None => return Err(CatalogWarning::new(file, None, "no library prefix declared")),
        };
        let mut warnings: Vec<CatalogWarning> = skipped
            .into_iter()
            .map(|header| {
                CatalogWarning::new(
                    file,
                    Some(header.line),
                    format!("skipped block with unrecognized header `{}`", header.text),
                )
            })
            .collect();

        let functions = blocks
            .into_iter()
            .map(|block| {
                let (signature, warning) = self.signature(file, &prefix, block);
                warnings.extend(warning);
                signature
            })
            .collect();

        Ok(LibraryParse {
            prefix,
            functions,
            warnings,
        })
    }

    fn signature(
        &self,
        file: &str,
        prefix: &str,
        block: DocBlock,
    ) -> (FunctionSignature, Option<CatalogWarning>) {
        let mut warning = None;
        let shape = if block.usage.is_empty() {
            let args = block
                .definition
                .as_deref()
                .and_then(|definition| args_from_definition(&block.name, definition))
                .unwrap_or_default();
            UsageShape {
                args,
                ..UsageShape::default()
            }
        } else {
            shape_from_usage(&block.name, &block.usage).unwrap_or_else(|| {
                warning = Some(CatalogWarning::new(
                    file,
                    Some(block.line),
                    format!("could not parse usage of `{}`; arity not enforced", block.name),
                ));
                UsageShape::default()
            })
        };

        let signature = FunctionSignature::new(prefix, &block.name, shape.args, shape.inputs, shape.outputs)
            .with_description(truncate(&block.description.join(" "), self.description_limit))
            .with_param_docs(block.param_docs)
            .with_example(truncate(&block.example.join("\n"), self.example_limit));
        (signature, warning)
    }
}

/// Find `prefix is `xx`` (or `prefix: xx`) in the file's comments.
fn declared_prefix(content: &str) -> Option<&str> {
    content
        .lines()
        .filter_map(|line| line.trim().strip_prefix("//"))
        .find_map(|comment| {
            let lower = comment.to_ascii_lowercase();
            let index = lower
                .find("prefix is")
                .map(|i| i + "prefix is".len())
                .or_else(|| lower.find("prefix:").map(|i| i + "prefix:".len()))?;
            let rest = comment[index..].trim_start().trim_start_matches(['`', '"', '\'']);
            let end = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            let prefix = &rest[..end];
            is_identifier(prefix).then_some(prefix)
        })
}

/// Collect `xx = library("file.lib");` declarations as `file.lib -> xx`.
fn library_aliases(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let (lhs, rhs) = line.split_once('=')?;
            let alias = lhs.trim();
            let rest = rhs.trim_start().strip_prefix("library")?.trim_start();
            let quoted = rest.strip_prefix('(')?.trim_start().strip_prefix('"')?;
            let file = &quoted[..quoted.find('"')?];
            is_identifier(alias).then(|| (file.to_string(), alias.to_string()))
        })
        .collect()
}

fn relative_name(dir: &Path, path: &Path) -> String {
    path.strip_prefix(dir)
        .unwrap_or(path)
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Truncate to at most `limit` characters, on a character boundary.
fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((index, _)) => text[..index].trim_end().to_string(),
        None => text.to_string(),
    }
}
