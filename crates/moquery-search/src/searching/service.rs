//! Seam to the external search service
//!
//! The content store's search engine is not part of this crate. It is reached
//! through [`SearchService`], which hands back a positional [`ResultCursor`].

use crate::error::SearchResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity a search runs on behalf of; visibility of results is the
/// search service's concern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    user_id: String,
}

impl Principal {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

/// Handle to a managed object (XML, non-XML, or container) in the content store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObject {
    id: String,
}

impl ManagedObject {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Query language tag sent with every search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryType {
    XPath,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::XPath => f.write_str("XPath"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One sort key, interpreted by the search service
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Positional access to the results of one constructed search
pub trait ResultCursor {
    /// Result at 1-based `position`, or `None` past the last result
    ///
    /// # Errors
    /// Returns `SearchError::Upstream` when the search service fails to fetch
    fn result_at(&self, position: usize) -> SearchResult<Option<ManagedObject>>;
}

/// The external search service
///
/// Implementations must be safe to share between threads; this crate adds no
/// synchronization of its own.
pub trait SearchService: Send + Sync {
    /// Construct a search and return a cursor over its results
    ///
    /// `sort_order` of `None` leaves ordering to the service's default, which
    /// is unspecified.
    ///
    /// # Errors
    /// Returns `SearchError::Upstream` when the service rejects the query or
    /// is unavailable
    fn construct_search(
        &self,
        principal: &Principal,
        query_type: QueryType,
        query: &str,
        sort_order: Option<&[SortOrder]>,
    ) -> SearchResult<Box<dyn ResultCursor>>;
}
