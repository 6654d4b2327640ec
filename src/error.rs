use std::{fmt::Debug, io, path::PathBuf};

use thiserror::Error;

/// Errors raised by tree mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError<K: Debug> {
    #[error("key {0:?} is already present")]
    DuplicateKey(K),
}

/// Errors raised while building a course catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed course record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error(transparent)]
    Tree(#[from] TreeError<String>),

    #[error("cannot read course data from {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Whether a bulk load may skip the offending line and carry on.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CatalogError::SourceUnavailable { .. })
    }
}
