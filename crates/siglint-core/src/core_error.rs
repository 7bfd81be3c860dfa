//! Errors raised while (de)serializing catalog artifacts.

use thiserror::Error;

/// Error type for loading and storing catalog artifacts.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid catalog artifact: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported {artifact} version `{found}` (expected `{expected}`)")]
    UnsupportedVersion {
        artifact: &'static str,
        found: String,
        expected: &'static str,
    },
}
