//! Reading and writing persisted catalog artifacts.
//!
//! Artifacts are pretty-printed JSON files; parent directories are created
//! on write.

use std::{fs, path::Path};

use log::info;

use siglint_core::{error_catalog::ErrorCatalog, signature::LibraryCatalog};

use crate::CatalogError;

/// Write a function-signature catalog artifact.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file or its parent directory cannot
/// be written.
pub fn write_catalog(path: impl AsRef<Path>, catalog: &LibraryCatalog) -> Result<(), CatalogError> {
    let path = path.as_ref();
    write_json(path, &catalog.to_json()?)?;
    info!(
        path = path.display().to_string(),
        libraries = catalog.libraries().len(),
        functions = catalog.functions().len();
        "Catalog written"
    );
    Ok(())
}

/// Load a function-signature catalog artifact.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read and
/// [`CatalogError::Artifact`] if it is not a valid catalog of the current
/// version.
pub fn read_catalog(path: impl AsRef<Path>) -> Result<LibraryCatalog, CatalogError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
    Ok(LibraryCatalog::from_json(&json)?)
}

/// Write an error-pattern catalog artifact.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file or its parent directory cannot
/// be written.
pub fn write_error_catalog(
    path: impl AsRef<Path>,
    catalog: &ErrorCatalog,
) -> Result<(), CatalogError> {
    let path = path.as_ref();
    write_json(path, &catalog.to_json()?)?;
    info!(
        path = path.display().to_string(),
        patterns = catalog.len(),
        raw_errors = catalog.raw_errors().len();
        "Error catalog written"
    );
    Ok(())
}

/// Load an error-pattern catalog artifact.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file cannot be read and
/// [`CatalogError::Artifact`] if it is not a valid error catalog of the
/// current version.
pub fn read_error_catalog(path: impl AsRef<Path>) -> Result<ErrorCatalog, CatalogError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
    Ok(ErrorCatalog::from_json(&json)?)
}

fn write_json(path: &Path, json: &str) -> Result<(), CatalogError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| CatalogError::io(parent, err))?;
        }
    }
    fs::write(path, json).map_err(|err| CatalogError::io(path, err))
}
