//! Error types for siglint operations.
//!
//! Validation itself never fails: problems in checked source are
//! [`Diagnostic`](siglint_core::error::Diagnostic)s inside a
//! [`ValidationResult`](crate::ValidationResult). [`SiglintError`] covers
//! everything around it: loading catalogs and configuration, reading input
//! and serializing output.

use std::io;

use thiserror::Error;

use siglint_catalog::CatalogError;

/// The main error type for siglint operations.
#[derive(Debug, Error)]
pub enum SiglintError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid rule setting `{field}`: {reason}")]
    InvalidRule { field: &'static str, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
