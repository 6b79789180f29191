//! Error types for consent stores

use std::path::PathBuf;
use thiserror::Error;

/// Failures of a persistence substrate.
///
/// Reading never fails (a missing or corrupt flag is `Unknown`); only
/// writing to a durable substrate can.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
