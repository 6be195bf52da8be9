//! Search execution against the external search service
pub mod search;
pub mod service;

pub use search::{ManagedObjectSearch, PROGRESS_LOG_INTERVAL};
pub use service::{
    ManagedObject, Principal, QueryType, ResultCursor, SearchService, SortDirection, SortOrder,
};

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
