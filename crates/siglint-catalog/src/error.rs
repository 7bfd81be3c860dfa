//! Error and warning types for catalog builds.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use siglint_core::CoreError;

/// Fatal catalog build or artifact error.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error(transparent)]
    Artifact(#[from] CoreError),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A non-fatal problem found while building a catalog.
///
/// The offending file or documentation block was skipped; the build went on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogWarning {
    file: String,
    line: Option<usize>,
    message: String,
}

impl CatalogWarning {
    pub fn new(file: impl Into<String>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// File the warning refers to, relative to the input directory.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line, if the warning refers to a specific block.
    pub fn line(&self) -> Option<usize> {
        self.line
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}: {}", self.file, line, self.message),
            None => write!(f, "{}: {}", self.file, self.message),
        }
    }
}
