//! Error-pattern catalog builder.

mod curated;
mod scan;

use std::path::Path;

use log::info;

use siglint_core::error_catalog::ErrorCatalog;

use crate::{CatalogError, CatalogWarning};

pub use curated::curated_patterns;

/// The curated error-pattern table as a catalog, without raw errors.
pub fn curated_catalog() -> ErrorCatalog {
    ErrorCatalog::new("curated", curated_patterns())
}

/// Builds the [`ErrorCatalog`]: the curated table, optionally extended with
/// literal error strings scanned from compiler sources.
#[derive(Debug, Clone)]
pub struct ErrorCatalogBuilder {
    extensions: Vec<String>,
    marker: String,
}

impl Default for ErrorCatalogBuilder {
    fn default() -> Self {
        Self {
            extensions: ["cpp", "hh", "h", "hpp"].map(String::from).to_vec(),
            marker: "ERROR".to_string(),
        }
    }
}

/// Result of an error-catalog build.
#[derive(Debug, Clone)]
pub struct ErrorCatalogBuild {
    catalog: ErrorCatalog,
    warnings: Vec<CatalogWarning>,
}

impl ErrorCatalogBuild {
    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    pub fn warnings(&self) -> &[CatalogWarning] {
        &self.warnings
    }

    pub fn into_catalog(self) -> ErrorCatalog {
        self.catalog
    }
}

impl ErrorCatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source-file extensions scanned for error strings.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Text a string literal must contain to be collected.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Build the catalog. Without `compiler_sources` only the curated table
    /// is produced.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingDirectory`] if `compiler_sources` is
    /// given but is not a directory.
    pub fn build(&self, compiler_sources: Option<&Path>) -> Result<ErrorCatalogBuild, CatalogError> {
        let Some(dir) = compiler_sources else {
            let catalog = curated_catalog();
            info!(patterns = catalog.len(); "Error catalog built from curated table");
            return Ok(ErrorCatalogBuild {
                catalog,
                warnings: Vec::new(),
            });
        };
        if !dir.is_dir() {
            return Err(CatalogError::MissingDirectory(dir.to_path_buf()));
        }

        let scanned = scan::scan_directory(dir, &self.extensions, &self.marker);
        let catalog = ErrorCatalog::new(dir.display().to_string(), curated_patterns())
            .with_raw_errors(scanned.raw_errors);
        info!(
            patterns = catalog.len(),
            raw_errors = catalog.raw_errors().len(),
            warnings = scanned.warnings.len();
            "Error catalog built"
        );
        Ok(ErrorCatalogBuild {
            catalog,
            warnings: scanned.warnings,
        })
    }
}
