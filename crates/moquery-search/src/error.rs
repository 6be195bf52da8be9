use moquery_common::CommonError;
use thiserror::Error;

/// Search-specific error types
#[derive(Error, Debug)]
pub enum SearchError {
    /// A required search parameter was blank; nothing was submitted
    #[error("{0}")]
    Configuration(String),

    /// The cursor held more results than the caller allowed.
    /// Whatever was collected before the limit tripped is discarded.
    #[error("Max result count threshold of {max_result_count} exceeded.")]
    MaxResultsExceeded { max_result_count: usize },

    /// Failure reported by the search service, passed through untouched
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

impl CommonError for SearchError {
    fn config_error(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type for search operations
pub type SearchResult<T> = std::result::Result<T, SearchError>;
