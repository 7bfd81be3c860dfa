//! Library-signature catalog builder.
//!
//! Turns DSL library sources into a [`LibraryCatalog`](siglint_core::signature::LibraryCatalog):
//! the namespace prefix comes from a header comment (or from an
//! `xx = library("file.lib")` alias declared elsewhere in the directory),
//! each documentation block becomes one
//! [`FunctionSignature`](siglint_core::signature::FunctionSignature).

mod builder;
mod doc_block;
mod usage;

pub use builder::{CatalogBuild, LibraryCatalogBuilder, LibraryParse};
