//! Test utilities for search services

// Allow test-specific patterns in mock implementation
#![allow(clippy::unwrap_used)] // Mocks can panic on lock poisoning

use super::service::{
    ManagedObject, Principal, QueryType, ResultCursor, SearchService, SortOrder,
};
use crate::error::{SearchError, SearchResult};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One call to [`SearchService::construct_search`] as the mock saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedSearch {
    pub principal: Principal,
    pub query_type: QueryType,
    pub query: String,
    pub sort_order: Option<Vec<SortOrder>>,
}

/// Mock search service serving a fixed result list for every query
///
/// Results come back in the order given, regardless of sort order. Every
/// submitted search and every cursor lookup is recorded for assertions.
#[derive(Default)]
pub struct MockSearchService {
    results: Vec<ManagedObject>,
    submitted: Mutex<Vec<SubmittedSearch>>,
    fetched: Arc<Mutex<Vec<usize>>>,

    // Behavior controls for testing
    construct_error: Mutex<Option<String>>,
    cursor_error: Mutex<Option<(usize, String)>>,
    fetch_delay: Mutex<Option<Duration>>,
}

impl MockSearchService {
    /// Create a mock whose cursor holds one managed object per ID
    pub fn with_ids<I>(ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToString,
    {
        Self {
            results: ids
                .into_iter()
                .map(|id| ManagedObject::new(id.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// Create a mock whose cursor is empty
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fail `construct_search` with `message` from now on
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned
    pub fn fail_construct(&self, message: &str) {
        *self.construct_error.lock().unwrap() = Some(message.to_string());
    }

    /// Fail the lookup of 1-based `position` in cursors constructed from now on
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned
    pub fn fail_at_position(&self, position: usize, message: &str) {
        *self.cursor_error.lock().unwrap() = Some((position, message.to_string()));
    }

    /// Sleep for `delay` on every lookup in cursors constructed from now on
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned
    pub fn delay_each_fetch(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    /// Searches submitted so far, oldest first
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned
    pub fn submitted(&self) -> Vec<SubmittedSearch> {
        self.submitted.lock().unwrap().clone()
    }

    /// Every position looked up on any cursor, in call order
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned
    pub fn fetched_positions(&self) -> Vec<usize> {
        self.fetched.lock().unwrap().clone()
    }

    /// Number of cursor lookups so far
    pub fn fetches(&self) -> usize {
        self.fetched_positions().len()
    }
}

impl SearchService for MockSearchService {
    fn construct_search(
        &self,
        principal: &Principal,
        query_type: QueryType,
        query: &str,
        sort_order: Option<&[SortOrder]>,
    ) -> SearchResult<Box<dyn ResultCursor>> {
        self.submitted.lock().unwrap().push(SubmittedSearch {
            principal: principal.clone(),
            query_type,
            query: query.to_string(),
            sort_order: sort_order.map(<[SortOrder]>::to_vec),
        });

        if let Some(message) = self.construct_error.lock().unwrap().clone() {
            return Err(SearchError::Upstream(anyhow::anyhow!(message)));
        }

        Ok(Box::new(MockCursor {
            results: self.results.clone(),
            fetched: Arc::clone(&self.fetched),
            fail_at: self.cursor_error.lock().unwrap().clone(),
            delay: *self.fetch_delay.lock().unwrap(),
        }))
    }
}

struct MockCursor {
    results: Vec<ManagedObject>,
    fetched: Arc<Mutex<Vec<usize>>>,
    fail_at: Option<(usize, String)>,
    delay: Option<Duration>,
}

impl ResultCursor for MockCursor {
    fn result_at(&self, position: usize) -> SearchResult<Option<ManagedObject>> {
        self.fetched.lock().unwrap().push(position);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        if let Some((fail_position, message)) = &self.fail_at
            && *fail_position == position
        {
            return Err(SearchError::Upstream(anyhow::anyhow!(message.clone())));
        }

        Ok(position
            .checked_sub(1)
            .and_then(|index| self.results.get(index))
            .cloned())
    }
}
