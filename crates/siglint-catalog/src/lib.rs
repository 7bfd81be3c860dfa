//! # Siglint Catalog
//!
//! Offline, explicitly triggered builders for the two catalogs the
//! validation engine runs against:
//!
//! - [`LibraryCatalogBuilder`] reads DSL library sources (`*.lib`) and
//!   produces a [`LibraryCatalog`] of documented function signatures.
//! - [`ErrorCatalogBuilder`] produces the curated [`ErrorCatalog`],
//!   optionally augmented with literal error strings scanned from compiler
//!   sources.
//!
//! Both builders are tolerant: a malformed file or documentation block is
//! reported as a [`CatalogWarning`] and skipped; only an unusable input
//! directory or a failed artifact write is an error.
//!
//! ## Usage
//!
//! ```no_run
//! # use siglint_catalog::{LibraryCatalogBuilder, artifact};
//! # fn main() -> Result<(), siglint_catalog::CatalogError> {
//! let build = LibraryCatalogBuilder::new().build("libraries")?;
//! for warning in build.warnings() {
//!     eprintln!("{warning}");
//! }
//! artifact::write_catalog("catalog.json", build.catalog())?;
//! # Ok(())
//! # }
//! ```

pub mod artifact;

mod error;
mod errors;
mod library;

pub use error::{CatalogError, CatalogWarning};
pub use errors::{ErrorCatalogBuild, ErrorCatalogBuilder, curated_catalog, curated_patterns};
pub use library::{CatalogBuild, LibraryCatalogBuilder, LibraryParse};

pub use siglint_core::{error_catalog::ErrorCatalog, signature::LibraryCatalog};
