//! Search orchestration: assemble the XPath, submit it, drain the cursor

use super::service::{ManagedObject, Principal, QueryType, SearchService, SortOrder};
use crate::error::{SearchError, SearchResult};
use crate::query::{ContentAssemblyQuery, ManagedObjectQuery};
use moquery_common::{CorrelationId, require_non_blank};
use moquery_config::SearchConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often draining logs progress; matches the search engine's default
/// page size
pub const PROGRESS_LOG_INTERVAL: usize = 600;

/// Runs searches against an injected [`SearchService`] and collects the
/// results in memory
///
/// Meant for searches expected to match a modest number of objects; every
/// match is held in the returned `Vec`.
pub struct ManagedObjectSearch {
    service: Arc<dyn SearchService>,
    config: SearchConfig,
}

impl ManagedObjectSearch {
    /// Create with default search configuration
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self::with_config(service, SearchConfig::default())
    }

    pub const fn with_config(service: Arc<dyn SearchService>, config: SearchConfig) -> Self {
        Self { service, config }
    }

    /// Search for XML MOs, non-XML MOs, or CA nodes by element name and
    /// layered metadata
    ///
    /// # Errors
    /// `MaxResultsExceeded` when more than `query.max_result_count` match,
    /// `Upstream` when the search service fails
    pub fn search_for_managed_objects(
        &self,
        principal: &Principal,
        query: &ManagedObjectQuery,
    ) -> SearchResult<Vec<ManagedObject>> {
        let xpath = query.to_xpath();
        self.search_for_objects(principal, xpath.as_str(), None, query.max_result_count)
    }

    /// Search for content assemblies, optionally sorted
    ///
    /// # Errors
    /// `MaxResultsExceeded` when more than `query.max_result_count` match,
    /// `Upstream` when the search service fails
    pub fn search_for_content_assemblies(
        &self,
        principal: &Principal,
        query: &ContentAssemblyQuery,
    ) -> SearchResult<Vec<ManagedObject>> {
        let xpath = query.to_xpath();
        self.search_for_objects(
            principal,
            xpath.as_str(),
            query.sort_order.as_deref(),
            query.max_result_count,
        )
    }

    /// IDs of the content assemblies of one CA type
    ///
    /// # Errors
    /// `Configuration` when `query.ca_type` is absent or blank, before
    /// anything is submitted; otherwise as
    /// [`search_for_content_assemblies`](Self::search_for_content_assemblies)
    pub fn search_for_content_assembly_ids(
        &self,
        principal: &Principal,
        query: &ContentAssemblyQuery,
    ) -> SearchResult<Vec<String>> {
        require_non_blank::<SearchError>(query.ca_type.as_deref(), "CA type")?;
        let xpath = query.to_xpath();
        self.search_for_object_ids(
            principal,
            xpath.as_str(),
            query.sort_order.as_deref(),
            query.max_result_count,
        )
    }

    /// IDs of the objects matching an XPath expression; objects may be MOs or
    /// containers
    ///
    /// # Errors
    /// As [`search_for_objects`](Self::search_for_objects)
    pub fn search_for_object_ids(
        &self,
        principal: &Principal,
        query: &str,
        sort_order: Option<&[SortOrder]>,
        max_result_count: usize,
    ) -> SearchResult<Vec<String>> {
        let objects = self.search_for_objects(principal, query, sort_order, max_result_count)?;
        Ok(objects.into_iter().map(|mo| mo.id().to_string()).collect())
    }

    /// Execute an XPath search and collect every result
    ///
    /// `max_result_count` of zero collects everything. Otherwise finding more
    /// than `max_result_count` results is an error rather than a truncation:
    /// to fetch the single expected match while proving it is the only one,
    /// pass 2.
    ///
    /// The completion log line is written whether the search succeeds or not.
    ///
    /// # Errors
    /// `MaxResultsExceeded` past the limit, dropping what was collected;
    /// `Upstream` when constructing the search or fetching a result fails
    #[tracing::instrument(
        skip_all,
        fields(correlation_id, user = principal.user_id(), max_result_count = max_result_count)
    )]
    pub fn search_for_objects(
        &self,
        principal: &Principal,
        query: &str,
        sort_order: Option<&[SortOrder]>,
        max_result_count: usize,
    ) -> SearchResult<Vec<ManagedObject>> {
        let correlation_id = CorrelationId::new();
        tracing::Span::current().record("correlation_id", correlation_id.to_string());

        if self.config.log_query_text {
            tracing::info!("Submitting XPath search: {query}");
        } else {
            tracing::info!(query_len = query.len(), "Submitting XPath search");
        }

        let start = Instant::now();
        let mut results = Vec::new();
        let outcome = self.drain(
            principal,
            query,
            sort_order,
            max_result_count,
            start,
            &mut results,
        );
        self.log_completion(results.len(), start.elapsed());

        outcome.map(|()| results)
    }

    fn drain(
        &self,
        principal: &Principal,
        query: &str,
        sort_order: Option<&[SortOrder]>,
        max_result_count: usize,
        start: Instant,
        results: &mut Vec<ManagedObject>,
    ) -> SearchResult<()> {
        let cursor = self
            .service
            .construct_search(principal, QueryType::XPath, query, sort_order)?;

        let mut position: usize = 0;
        loop {
            position = position.saturating_add(1);
            let Some(mo) = cursor.result_at(position)? else {
                return Ok(());
            };
            results.push(mo);

            if max_result_count > 0 && position > max_result_count {
                return Err(SearchError::MaxResultsExceeded { max_result_count });
            }

            if position.is_multiple_of(PROGRESS_LOG_INTERVAL) {
                let elapsed_ms = elapsed_millis(start.elapsed());
                tracing::info!(
                    collected = position,
                    elapsed_ms,
                    "Ongoing: collected {position} search results in {elapsed_ms} millis"
                );
            }
        }
    }

    fn log_completion(&self, collected: usize, elapsed: Duration) {
        let elapsed_ms = elapsed_millis(elapsed);
        if elapsed_ms > self.config.slow_search_warn_ms {
            tracing::warn!(
                collected,
                elapsed_ms,
                "Complete: collected {collected} search results in {elapsed_ms} millis (slow)"
            );
        } else {
            tracing::info!(
                collected,
                elapsed_ms,
                "Complete: collected {collected} search results in {elapsed_ms} millis"
            );
        }
    }
}

fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{NameValuesPair, QualifiedName, XPATH_ANY_CA};
    use crate::searching::test_utils::MockSearchService;
    use pretty_assertions::assert_eq;

    fn principal() -> Principal {
        Principal::new("jdoe")
    }

    fn search_over(mock: &Arc<MockSearchService>) -> ManagedObjectSearch {
        ManagedObjectSearch::new(Arc::clone(mock) as Arc<dyn SearchService>)
    }

    #[test]
    fn test_empty_cursor_yields_empty_list() {
        let mock = Arc::new(MockSearchService::empty());
        let results = search_over(&mock)
            .search_for_objects(&principal(), "/book", None, 0)
            .unwrap();

        assert!(results.is_empty());
        assert_eq!(mock.submitted().len(), 1);
    }

    #[test]
    fn test_zero_limit_collects_everything_in_cursor_order() {
        let mock = Arc::new(MockSearchService::with_ids(1..=1500));
        let ids = search_over(&mock)
            .search_for_object_ids(&principal(), "/book", None, 0)
            .unwrap();

        assert_eq!(ids.len(), 1500);
        assert_eq!(ids.first().map(String::as_str), Some("1"));
        assert_eq!(ids.last().map(String::as_str), Some("1500"));
    }

    #[test]
    fn test_exactly_max_results_succeeds() {
        let mock = Arc::new(MockSearchService::with_ids(1..=3));
        let results = search_over(&mock)
            .search_for_objects(&principal(), "/book", None, 3)
            .unwrap();

        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_one_past_max_results_fails() {
        let mock = Arc::new(MockSearchService::with_ids(1..=4));
        let result = search_over(&mock).search_for_objects(&principal(), "/book", None, 3);

        assert!(matches!(
            result,
            Err(SearchError::MaxResultsExceeded { max_result_count: 3 })
        ));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Max result count threshold of 3 exceeded."
        );
    }

    #[test]
    fn test_threshold_stops_reading_the_cursor() {
        let mock = Arc::new(MockSearchService::with_ids(1..=100));
        let result = search_over(&mock).search_for_objects(&principal(), "/book", None, 1);

        assert!(result.is_err());
        assert_eq!(mock.fetches(), 2);
    }

    #[test]
    fn test_cursor_is_read_from_position_one() {
        let mock = Arc::new(MockSearchService::with_ids(["a", "b"]));
        search_over(&mock)
            .search_for_objects(&principal(), "/book", None, 0)
            .unwrap();

        // two hits plus the lookup that found the end
        assert_eq!(mock.fetched_positions(), vec![1, 2, 3]);
    }

    #[test]
    fn test_construct_failure_propagates_unchanged() {
        let mock = Arc::new(MockSearchService::empty());
        mock.fail_construct("XDMP-UNDFUN: undefined function");

        let err = search_over(&mock)
            .search_for_objects(&principal(), "/book[bogus()]", None, 0)
            .unwrap_err();

        assert!(matches!(err, SearchError::Upstream(_)));
        assert_eq!(err.to_string(), "XDMP-UNDFUN: undefined function");
    }

    #[test]
    fn test_cursor_failure_midway_propagates() {
        let mock = Arc::new(MockSearchService::with_ids(1..=10));
        mock.fail_at_position(5, "connection reset");

        let err = search_over(&mock)
            .search_for_objects(&principal(), "/book", None, 0)
            .unwrap_err();

        assert!(matches!(err, SearchError::Upstream(_)));
        assert_eq!(mock.fetches(), 5);
    }

    #[test]
    fn test_every_submission_is_tagged_xpath() {
        let mock = Arc::new(MockSearchService::empty());
        search_over(&mock)
            .search_for_objects(&principal(), "/book", None, 0)
            .unwrap();

        let submitted = mock.submitted();
        assert_eq!(submitted[0].query_type, QueryType::XPath);
        assert_eq!(submitted[0].principal, principal());
    }

    #[test]
    fn test_managed_object_search_submits_rendered_query() {
        let mock = Arc::new(MockSearchService::with_ids(["7"]));
        let query = ManagedObjectQuery::new(QualifiedName::local("book"))
            .with_criterion(NameValuesPair::new("status", ["draft"]))
            .with_max_result_count(2);

        let results = search_over(&mock)
            .search_for_managed_objects(&principal(), &query)
            .unwrap();

        assert_eq!(results, vec![ManagedObject::new("7")]);
        let submitted = mock.submitted();
        assert_eq!(
            submitted[0].query,
            "/book[./mv:metadata/mv-lmd:layered/mv-lmd:status/text() = ('draft')]"
        );
        assert_eq!(submitted[0].sort_order, None);
    }

    #[test]
    fn test_content_assembly_search_passes_sort_order_through() {
        let mock = Arc::new(MockSearchService::with_ids(["3", "1", "2"]));
        let sort = vec![SortOrder::descending("last-modified")];
        let query = ContentAssemblyQuery::new().with_sort_order(sort.clone());

        let results = search_over(&mock)
            .search_for_content_assemblies(&principal(), &query)
            .unwrap();

        // ordering is the service's job; results come back as the cursor had them
        let ids: Vec<&str> = results.iter().map(ManagedObject::id).collect();
        assert_eq!(ids, ["3", "1", "2"]);
        assert_eq!(mock.submitted()[0].sort_order, Some(sort));
        assert_eq!(mock.submitted()[0].query, XPATH_ANY_CA);
    }

    #[test]
    fn test_content_assembly_ids_require_ca_type() {
        for query in [
            ContentAssemblyQuery::new(),
            ContentAssemblyQuery::of_type(""),
            ContentAssemblyQuery::of_type(" \t")
                .with_layered_metadata("status", ["published"])
                .excluding("42")
                .with_max_result_count(5),
        ] {
            let mock = Arc::new(MockSearchService::with_ids(1..=3));
            let err = search_over(&mock)
                .search_for_content_assembly_ids(&principal(), &query)
                .unwrap_err();

            assert!(matches!(err, SearchError::Configuration(_)));
            assert_eq!(
                err.to_string(),
                "CA type is empty, but is required by this search."
            );
            assert!(mock.submitted().is_empty(), "nothing may be submitted");
        }
    }

    #[test]
    fn test_content_assembly_ids_projects_identifiers() {
        let mock = Arc::new(MockSearchService::with_ids(["ca-1", "ca-2"]));
        let query = ContentAssemblyQuery::of_type("article");

        let ids = search_over(&mock)
            .search_for_content_assembly_ids(&principal(), &query)
            .unwrap();

        assert_eq!(ids, ["ca-1", "ca-2"]);
        assert_eq!(
            mock.submitted()[0].query,
            "/rs_ca_map/rs_ca[./mv:metadata/mv:system/mv:ca-type/text() = ('article')]"
        );
    }

    #[test]
    fn test_completion_is_logged_when_threshold_is_exceeded() {
        let mock = Arc::new(MockSearchService::with_ids(1..=5));

        let (result, logs) = captured_logs(|| {
            search_over(&mock).search_for_objects(&principal(), "/book", None, 1)
        });

        assert!(matches!(
            result,
            Err(SearchError::MaxResultsExceeded { max_result_count: 1 })
        ));
        assert!(logs.contains("Complete: collected 2 search results"), "{logs}");
    }

    #[test]
    fn test_completion_is_logged_when_upstream_fails() {
        let mock = Arc::new(MockSearchService::with_ids(1..=5));
        mock.fail_at_position(2, "connection reset");

        let (result, logs) = captured_logs(|| {
            search_over(&mock).search_for_objects(&principal(), "/book", None, 0)
        });

        assert!(matches!(result, Err(SearchError::Upstream(_))));
        assert!(logs.contains("Complete: collected 1 search results"), "{logs}");
    }

    #[test]
    fn test_completion_is_logged_when_construction_fails() {
        let mock = Arc::new(MockSearchService::empty());
        mock.fail_construct("XDMP-UNDFUN: undefined function");

        let (result, logs) = captured_logs(|| {
            search_over(&mock).search_for_objects(&principal(), "/book", None, 0)
        });

        assert!(result.is_err());
        assert!(logs.contains("Complete: collected 0 search results"), "{logs}");
    }

    #[test]
    fn test_progress_is_logged_every_interval() {
        let mock = Arc::new(MockSearchService::with_ids(1..=1500));

        let (result, logs) = captured_logs(|| {
            search_over(&mock).search_for_objects(&principal(), "/book", None, 0)
        });

        assert_eq!(result.unwrap().len(), 1500);
        assert_eq!(logs.matches("Ongoing:").count(), 2);
        assert!(logs.contains("Ongoing: collected 600 search results"));
        assert!(logs.contains("Ongoing: collected 1200 search results"));
    }

    #[rstest::rstest]
    #[case::shown(true)]
    #[case::hidden(false)]
    fn test_submission_log_honours_query_text_setting(#[case] log_query_text: bool) {
        let mock = Arc::new(MockSearchService::with_ids(["1"]));
        let config = SearchConfig {
            log_query_text,
            ..SearchConfig::default()
        };
        let search =
            ManagedObjectSearch::with_config(Arc::clone(&mock) as Arc<dyn SearchService>, config);
        let query = "/book[./mv:metadata/mv-lmd:layered/mv-lmd:codename/text() = ('nightjar')]";

        let (result, logs) =
            captured_logs(|| search.search_for_objects(&principal(), query, None, 0));

        assert_eq!(result.unwrap().len(), 1);
        assert_eq!(logs.contains("nightjar"), log_query_text, "{logs}");
        assert_eq!(logs.contains("query_len="), !log_query_text, "{logs}");
    }

    #[test]
    fn test_slow_search_completes_at_warn_level() {
        let mock = Arc::new(MockSearchService::with_ids(1..=2));
        mock.delay_each_fetch(Duration::from_millis(5));
        let config = SearchConfig {
            slow_search_warn_ms: 1,
            ..SearchConfig::default()
        };
        let search =
            ManagedObjectSearch::with_config(Arc::clone(&mock) as Arc<dyn SearchService>, config);

        let (_, logs) = captured_logs(|| search.search_for_objects(&principal(), "/book", None, 0));

        let completion = completion_line(&logs);
        assert!(completion.contains("WARN"), "{completion}");
        assert!(completion.contains("(slow)"), "{completion}");
    }

    #[test]
    fn test_fast_search_completes_at_info_level() {
        let mock = Arc::new(MockSearchService::with_ids(1..=2));

        let (_, logs) = captured_logs(|| {
            search_over(&mock).search_for_objects(&principal(), "/book", None, 0)
        });

        let completion = completion_line(&logs);
        assert!(completion.contains("INFO"), "{completion}");
        assert!(!completion.contains("(slow)"), "{completion}");
    }

    /// Log output shared between the fmt layer and the test
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Run `f` with a thread-local subscriber and return its result and the log text
    fn captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8_lossy(&logs.0.lock().unwrap()).into_owned();
        (result, text)
    }

    fn completion_line(logs: &str) -> String {
        logs.lines()
            .find(|line| line.contains("Complete:"))
            .unwrap_or_default()
            .to_string()
    }
}
