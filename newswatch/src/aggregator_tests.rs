//! Pagination and error-policy tests for SearchAggregator.

#[cfg(test)]
mod tests {
    use crate::aggregator::SearchAggregator;
    use crate::backend::{MockSearchBackend, SearchPage};
    use crate::config::{ErrorPolicy, SearchConfig};
    use crate::errors::WatchError;
    use crate::events::{CollectingSearchObserver, SearchEvent};
    use crate::models::{DateRange, RawResult, SearchQuery};
    use crate::testing::{raw_item, raw_page, MockBackend};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn query(target: usize) -> SearchQuery {
        SearchQuery::new("Webrazzi", target).unwrap()
    }

    #[tokio::test]
    async fn test_collects_exactly_target_across_pages() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_page(raw_page(11, 10))
                .with_page(raw_page(21, 10)),
        );
        let aggregator = SearchAggregator::new(backend.clone());

        let results = aggregator.search(&query(25)).await.unwrap();

        assert_eq!(results.len(), 25);
        assert_eq!(results.items()[0].title, "Result 1");
        assert_eq!(results.items()[24].title, "Result 25");
        let starts: Vec<usize> = backend.requests().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![1, 11, 21]);
        assert!(backend.requests().iter().all(|r| r.num == 10));
    }

    #[tokio::test]
    async fn test_stops_once_target_reached() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_page(raw_page(11, 10)),
        );
        let aggregator = SearchAggregator::new(backend.clone());

        let results = aggregator.search(&query(10)).await.unwrap();

        assert_eq!(results.len(), 10);
        assert_eq!(backend.call_count(), 1);
        assert_eq!(backend.remaining(), 1);
    }

    #[tokio::test]
    async fn test_configured_page_size_sets_offsets() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 5))
                .with_page(raw_page(6, 5))
                .with_page(raw_page(11, 5)),
        );
        let mut config = SearchConfig::default();
        config.page_size = 5;
        let aggregator = SearchAggregator::from_config(backend.clone(), &config);

        let results = aggregator.search(&query(12)).await.unwrap();

        assert_eq!(results.len(), 12);
        let starts: Vec<usize> = backend.requests().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![1, 6, 11]);
        assert!(backend.requests().iter().all(|r| r.num == 5));
    }

    #[tokio::test]
    async fn test_oversized_page_size_is_clamped_to_ten() {
        let backend = Arc::new(MockBackend::new().with_page(raw_page(1, 10)));
        let mut config = SearchConfig::default();
        config.page_size = 50;
        let aggregator = SearchAggregator::from_config(backend.clone(), &config);

        aggregator.search(&query(20)).await.unwrap();

        let starts: Vec<usize> = backend.requests().iter().map(|r| r.start).collect();
        assert_eq!(starts, vec![1, 11]);
        assert_eq!(backend.requests()[0].num, 10);
    }

    #[tokio::test]
    async fn test_small_target_truncates_first_page() {
        let backend = Arc::new(MockBackend::new().with_page(raw_page(1, 10)));
        let aggregator = SearchAggregator::new(backend.clone());

        let results = aggregator.search(&query(5)).await.unwrap();

        assert_eq!(results.len(), 5);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_backend_failure_on_first_page() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_fetch_page()
            .withf(|request| request.start == 1)
            .times(1)
            .returning(|_| Err(WatchError::backend(403)));
        let aggregator = SearchAggregator::new(Arc::new(backend));

        let err = aggregator.search(&query(100)).await.unwrap_err();

        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.kind(), "BackendError");
    }

    #[tokio::test]
    async fn test_transport_failure_is_fatal() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_fetch_page()
            .times(1)
            .returning(|_| Err(WatchError::transport("connection reset")));
        let aggregator = SearchAggregator::new(Arc::new(backend));

        let err = aggregator.search(&query(100)).await.unwrap_err();

        assert!(matches!(err, WatchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_empty_first_page_is_not_an_error() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_fetch_page()
            .times(1)
            .returning(|_| Ok(SearchPage::empty()));
        let aggregator = SearchAggregator::new(Arc::new(backend));

        let results = aggregator.search(&query(100)).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_exhaustion_returns_fewer_than_target() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_page(raw_page(11, 4)),
        );
        let aggregator = SearchAggregator::new(backend.clone());

        let results = aggregator.search(&query(100)).await.unwrap();

        assert_eq!(results.len(), 14);
        // the third request sees the exhausted script
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_discard_policy_drops_collected_results() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_error(WatchError::backend(500)),
        );
        let aggregator = SearchAggregator::new(backend);

        let err = aggregator.search(&query(100)).await.unwrap_err();

        assert_eq!(err.status_code(), Some(500));
    }

    #[tokio::test]
    async fn test_keep_partial_policy_returns_collected_results() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_error(WatchError::backend(500)),
        );
        let aggregator =
            SearchAggregator::new(backend).with_error_policy(ErrorPolicy::KeepPartial);

        let results = aggregator.search(&query(100)).await.unwrap();

        assert_eq!(results.len(), 10);
    }

    #[tokio::test]
    async fn test_keep_partial_with_nothing_collected_is_an_error() {
        let backend = Arc::new(MockBackend::new().with_error(WatchError::backend(429)));
        let config = SearchConfig::default().with_error_policy(ErrorPolicy::KeepPartial);
        let aggregator = SearchAggregator::from_config(backend, &config);

        assert_eq!(aggregator.error_policy(), ErrorPolicy::KeepPartial);
        let err = aggregator.search(&query(100)).await.unwrap_err();
        assert_eq!(err.status_code(), Some(429));
    }

    #[tokio::test]
    async fn test_search_partial_reports_both() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_page(raw_page(11, 10))
                .with_error(WatchError::backend(503)),
        );
        let aggregator = SearchAggregator::new(backend);

        let partial = aggregator.search_partial(&query(100)).await;

        assert!(!partial.is_complete());
        assert_eq!(partial.pages_fetched, 2);
        assert_eq!(partial.results.len(), 20);
        assert_eq!(partial.error.and_then(|e| e.status_code()), Some(503));
    }

    #[tokio::test]
    async fn test_duplicates_are_preserved() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(vec![raw_item(1), raw_item(2)])
                .with_page(vec![raw_item(2), raw_item(3)]),
        );
        let aggregator = SearchAggregator::new(backend);

        let results = aggregator.search(&query(100)).await.unwrap();

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Result 1", "Result 2", "Result 2", "Result 3"]);
    }

    #[tokio::test]
    async fn test_items_are_annotated() {
        let item = RawResult::new(
            "Seed round",
            "https://www.webrazzi.com/2024/03/05/seed",
            "www.webrazzi.com",
            "Albert Health closed 5 March 2024 a seed round",
        );
        let undated = RawResult::new("Profile", "https://egirisim.com/p", "egirisim.com", "About")
            .with_published_time("2024-02-01T08:00:00Z");
        let backend = Arc::new(MockBackend::new().with_page(vec![item, undated]));
        let aggregator = SearchAggregator::new(backend);

        let results = aggregator.search(&query(100)).await.unwrap();

        let first = &results.items()[0];
        assert_eq!(first.site_name, "webrazzi.com");
        assert_eq!(first.date, "05 March 2024");
        assert_eq!(first.snippet, "Albert Health closed  a seed round");
        let second = &results.items()[1];
        assert_eq!(second.site_name, "egirisim.com");
        assert_eq!(second.date, "01 February 2024");
        assert_eq!(second.snippet, "About");
    }

    #[tokio::test]
    async fn test_request_carries_query_and_sort() {
        let backend = Arc::new(MockBackend::new());
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        )
        .unwrap();
        let query = query(100)
            .with_sites(["webrazzi.com", "egirisim.com"])
            .with_date_range(range);
        let aggregator = SearchAggregator::new(backend.clone());

        let results = aggregator.search(&query).await.unwrap();

        assert!(results.is_empty());
        let request = &backend.requests()[0];
        assert_eq!(
            request.query_text,
            "Webrazzi site:webrazzi.com OR site:egirisim.com"
        );
        assert_eq!(request.sort, "date:r:20240301:20240331");
    }

    #[tokio::test]
    async fn test_observer_sees_run() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 10))
                .with_page(raw_page(11, 10)),
        );
        let observer = Arc::new(CollectingSearchObserver::new());
        let aggregator = SearchAggregator::new(backend).with_observer(observer.clone());

        aggregator.search(&query(15)).await.unwrap();

        let events = observer.events();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            SearchEvent::Started {
                target_count: 15,
                ..
            }
        ));
        assert!(matches!(
            events[2],
            SearchEvent::Page {
                start: 11,
                items: 10,
                collected: 20
            }
        ));
        assert!(matches!(events[3], SearchEvent::Completed { results: 15 }));
        assert_eq!(observer.page_count(), 2);
    }

    #[tokio::test]
    async fn test_observer_sees_failure() {
        let backend = Arc::new(
            MockBackend::new()
                .with_page(raw_page(1, 3))
                .with_error(WatchError::backend(502)),
        );
        let observer = Arc::new(CollectingSearchObserver::new());
        let aggregator = SearchAggregator::new(backend).with_observer(observer.clone());

        assert!(aggregator.search(&query(100)).await.is_err());

        let events = observer.events();
        assert!(matches!(
            events.last(),
            Some(SearchEvent::Failed {
                kind: "BackendError",
                status: Some(502),
                salvaged: 3
            })
        ));
    }
}
