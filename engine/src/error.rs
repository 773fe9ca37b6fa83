//! Error types for the search engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while building or querying an index.
///
/// Ranking itself cannot fail; everything here comes from the corpus side.
#[derive(Debug, Error)]
pub enum SearchError {
    /// A document's text, or a category listing, could not be read.
    /// Aborts the whole build; no partial index is produced.
    #[error("failed to ingest {}: {source}", path.display())]
    IngestionFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reserved for query validation. An empty query is not invalid.
    #[error("invalid query: {0}")]
    InvalidQuery(String),
}

impl SearchError {
    pub(crate) fn ingestion(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SearchError::IngestionFailure { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
