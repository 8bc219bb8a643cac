//! Typed errors for the issue store.
//!
//! `StoreError` is what the store layer returns; the HTTP layer maps it onto
//! status codes in `board::api::ApiError`. Process-level plumbing (config,
//! startup) stays on `anyhow::Result`.

use thiserror::Error;

/// Errors from the JSON-file issue store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Issue {id} not found")]
    NotFound { id: i64 },

    #[error("I/O error on data file at {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data file at {path} is not a valid issue document: {source}")]
    Corrupt {
        path: std::path::PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize issues: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
