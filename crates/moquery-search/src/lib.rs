//! XPath search helpers for the content store
//!
//! This crate builds XPath expressions against the search service's
//! materialized view of managed objects and their metadata, submits them
//! through an injected [`SearchService`], and drains the result cursor into
//! a list.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use moquery_search::{ContentAssemblyQuery, ManagedObjectSearch, Principal, SearchService};
//! # fn demo(service: Arc<dyn SearchService>) -> moquery_search::SearchResult<()> {
//! let search = ManagedObjectSearch::new(service);
//! let query = ContentAssemblyQuery::of_type("article")
//!     .excluding("42")
//!     .with_layered_metadata("status", ["published"]);
//! let ids = search.search_for_content_assembly_ids(&Principal::new("jdoe"), &query)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod query;
pub mod searching;

// Re-export main types
pub use error::{SearchError, SearchResult};
pub use query::{
    ContentAssemblyQuery, ManagedObjectQuery, NameValuesPair, QualifiedName, SystemMetadata,
    XPathQuery,
};
pub use searching::{
    ManagedObject, ManagedObjectSearch, PROGRESS_LOG_INTERVAL, Principal, QueryType, ResultCursor,
    SearchService, SortDirection, SortOrder,
};

// Re-export test utilities when test-utils feature is enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks {
    pub use crate::searching::test_utils::{MockSearchService, SubmittedSearch};
}
