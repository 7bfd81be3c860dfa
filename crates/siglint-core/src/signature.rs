//! Library function signatures and the catalog that indexes them.
//!
//! The [`LibraryCatalog`] is built offline from library sources, persisted
//! as JSON and loaded read-only by the checker. Its serialized form is:
//!
//! ```text
//! { "version", "source",
//!   "libraries": { name: { "file", "prefix", "functionCount" } },
//!   "functions": { fullName: { "prefix", "name", "fullName", "args", "argCount",
//!                              "inputs", "outputs", "description", "paramDocs", "example" } } }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Version written to and expected from catalog artifacts.
pub const CATALOG_VERSION: &str = "1.0";

/// One documented library function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSignature {
    prefix: String,
    name: String,
    full_name: String,
    args: Vec<String>,
    arg_count: usize,
    inputs: usize,
    outputs: usize,
    #[serde(default)]
    description: String,
    #[serde(default)]
    param_docs: IndexMap<String, String>,
    #[serde(default)]
    example: String,
}

impl FunctionSignature {
    /// Create a signature; `full_name` and `arg_count` are derived.
    pub fn new(
        prefix: impl Into<String>,
        name: impl Into<String>,
        args: Vec<String>,
        inputs: usize,
        outputs: usize,
    ) -> Self {
        let prefix = prefix.into();
        let name = name.into();
        Self {
            full_name: format!("{prefix}.{name}"),
            arg_count: args.len(),
            prefix,
            name,
            args,
            inputs,
            outputs,
            description: String::new(),
            param_docs: IndexMap::new(),
            example: String::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the parameter documentation.
    pub fn with_param_docs(mut self, param_docs: IndexMap<String, String>) -> Self {
        self.param_docs = param_docs;
        self
    }

    /// Set the worked example.
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = example.into();
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `prefix.name`, the unique catalog key.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Declared argument count. Zero means arity is not enforced.
    pub fn arg_count(&self) -> usize {
        self.arg_count
    }

    pub fn inputs(&self) -> usize {
        self.inputs
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn param_docs(&self) -> &IndexMap<String, String> {
        &self.param_docs
    }

    pub fn example(&self) -> &str {
        &self.example
    }

    /// Render the call form, e.g. `fi.lowpass(N, fc)`.
    pub fn call_form(&self) -> String {
        format!("{}({})", self.full_name, self.args.join(", "))
    }
}

/// Summary of one library file in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryInfo {
    file: String,
    prefix: String,
    function_count: usize,
}

impl LibraryInfo {
    pub fn new(file: impl Into<String>, prefix: impl Into<String>, function_count: usize) -> Self {
        Self {
            file: file.into(),
            prefix: prefix.into(),
            function_count,
        }
    }

    /// Path of the source file, relative to the library directory.
    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn function_count(&self) -> usize {
        self.function_count
    }
}

/// The structured function database ("bible") the checker validates against.
///
/// Immutable once constructed: builders assemble the maps and hand them to
/// [`LibraryCatalog::from_parts`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryCatalog {
    version: String,
    source: String,
    libraries: IndexMap<String, LibraryInfo>,
    functions: IndexMap<String, FunctionSignature>,
}

impl LibraryCatalog {
    /// Assemble a catalog from already-built parts.
    pub fn from_parts(
        source: impl Into<String>,
        libraries: IndexMap<String, LibraryInfo>,
        functions: IndexMap<String, FunctionSignature>,
    ) -> Self {
        Self {
            version: CATALOG_VERSION.to_string(),
            source: source.into(),
            libraries,
            functions,
        }
    }

    /// A catalog with no libraries.
    pub fn empty() -> Self {
        Self::from_parts("", IndexMap::new(), IndexMap::new())
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Where the catalog was built from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn libraries(&self) -> &IndexMap<String, LibraryInfo> {
        &self.libraries
    }

    pub fn functions(&self) -> &IndexMap<String, FunctionSignature> {
        &self.functions
    }

    /// Look up a function by its full `prefix.name`.
    pub fn get(&self, full_name: &str) -> Option<&FunctionSignature> {
        self.functions.get(full_name)
    }

    /// Whether any library declares `prefix`.
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.libraries.values().any(|lib| lib.prefix == prefix)
    }

    /// All distinct library prefixes, in catalog order.
    pub fn prefixes(&self) -> Vec<&str> {
        let mut prefixes: Vec<&str> = Vec::new();
        for lib in self.libraries.values() {
            if !prefixes.contains(&lib.prefix.as_str()) {
                prefixes.push(&lib.prefix);
            }
        }
        prefixes
    }

    /// Functions declared under `prefix`, in catalog order.
    pub fn functions_in<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = &'a FunctionSignature> + 'a {
        self.functions.values().filter(move |sig| sig.prefix == prefix)
    }

    /// Up to `limit` full names under `prefix` whose name shares the first
    /// three characters of `name` (or all of `name` if it is shorter),
    /// sorted alphabetically.
    pub fn suggestions(&self, prefix: &str, name: &str, limit: usize) -> Vec<String> {
        let stem: String = name.chars().take(3).collect();
        let mut candidates: Vec<String> = self
            .functions_in(prefix)
            .filter(|sig| sig.name.starts_with(&stem))
            .map(|sig| sig.full_name.clone())
            .collect();
        candidates.sort();
        candidates.truncate(limit);
        candidates
    }

    /// Serialize to the pretty-printed JSON artifact.
    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a catalog artifact, checking its version.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let catalog: Self = serde_json::from_str(json)?;
        if catalog.version != CATALOG_VERSION {
            return Err(CoreError::UnsupportedVersion {
                artifact: "catalog",
                found: catalog.version,
                expected: CATALOG_VERSION,
            });
        }
        Ok(catalog)
    }
}

impl Default for LibraryCatalog {
    fn default() -> Self {
        Self::empty()
    }
}
