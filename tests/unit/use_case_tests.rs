use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use search_core::config::SearchConfig;
use search_core::search::use_case::{LIMIT_OUT_OF_RANGE, OFFSET_OUT_OF_RANGE, PAGE_REQUIRED, Q_REQUIRED};
use search_core::search::{
    Attributes, Page, SearchDeps, SearchPort, SearchQuery, SearchQueryDto, SearchResult,
    SearchUseCase, execute,
};
use search_core::test_utils::{RecordingPort, sample_item, sample_result};
use search_core::{AppError, ErrorCode};
use serde_json::{Value, json};

fn dto(value: Value) -> SearchQueryDto {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn valid_query_returns_port_result_unchanged() {
    let expected = SearchResult::empty(Page::new(10, 0));
    let port = RecordingPort::returning(expected.clone());
    let deps = SearchDeps::new(&port);

    let result = execute(&deps, SearchQueryDto::new("cats", 10, 0)).await.unwrap();

    assert_eq!(result, expected);
    assert_eq!(port.calls(), 1);
}

#[tokio::test]
async fn port_receives_the_query_as_sent() {
    let port = RecordingPort::returning(SearchResult::empty(Page::new(5, 20)));
    let mut filters = Attributes::new();
    filters.insert("speaker_id".to_string(), json!("spk-9"));
    let mut options = Attributes::new();
    options.insert("mode".to_string(), json!("semantic"));

    let query = SearchQueryDto::new("  black cats ", 5, 20)
        .with_filters(filters.clone())
        .with_options(options.clone());
    execute(&SearchDeps::new(&port), query).await.unwrap();

    let seen = port.last_query().unwrap();
    assert_eq!(seen.q(), "  black cats ");
    assert_eq!(seen.page(), Page::new(5, 20));
    assert_eq!(seen.filters(), Some(&filters));
    assert_eq!(seen.options(), Some(&options));
}

#[tokio::test]
async fn rank_order_is_preserved() {
    let items = vec![
        sample_item("c", 0.2),
        sample_item("a", 0.9),
        sample_item("b", 0.5),
    ];
    let port = RecordingPort::returning(sample_result(Page::new(3, 0), items));
    let result = execute(&SearchDeps::new(&port), SearchQueryDto::new("cats", 3, 0))
        .await
        .unwrap();
    let ids: Vec<&str> = result.items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn invalid_queries_never_reach_the_port() {
    let cases = vec![
        ("blank q", json!({ "q": "   ", "page": { "limit": 10, "offset": 0 } }), Q_REQUIRED),
        ("missing q", json!({ "page": { "limit": 10, "offset": 0 } }), Q_REQUIRED),
        ("missing page", json!({ "q": "cats" }), PAGE_REQUIRED),
        (
            "string limit",
            json!({ "q": "cats", "page": { "limit": "10", "offset": 0 } }),
            PAGE_REQUIRED,
        ),
        (
            "bool offset",
            json!({ "q": "cats", "page": { "limit": 10, "offset": false } }),
            PAGE_REQUIRED,
        ),
        ("scalar page", json!({ "q": "cats", "page": 5 }), PAGE_REQUIRED),
        ("string page", json!({ "q": "cats", "page": "x" }), PAGE_REQUIRED),
        ("array page", json!({ "q": "cats", "page": [10, 0] }), PAGE_REQUIRED),
        ("zero limit", json!({ "q": "cats", "page": { "limit": 0, "offset": 0 } }), LIMIT_OUT_OF_RANGE),
        ("limit 201", json!({ "q": "cats", "page": { "limit": 201, "offset": 0 } }), LIMIT_OUT_OF_RANGE),
        ("limit -5", json!({ "q": "cats", "page": { "limit": -5, "offset": 0 } }), LIMIT_OUT_OF_RANGE),
        (
            "negative offset",
            json!({ "q": "cats", "page": { "limit": 10, "offset": -1 } }),
            OFFSET_OUT_OF_RANGE,
        ),
    ];

    for (name, input, message) in cases {
        let port = RecordingPort::returning(SearchResult::empty(Page::new(10, 0)));
        let err = execute(&SearchDeps::new(&port), dto(input)).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError, "{name}");
        assert_eq!(err.message(), message, "{name}");
        assert_eq!(port.calls(), 0, "{name}");
    }
}

#[tokio::test]
async fn port_failure_propagates_untouched() {
    let failure = AppError::upstream_unavailable("opensearch unreachable")
        .with_details(json!({ "host": "search-1", "attempts": 3 }));
    let port = RecordingPort::failing(failure.clone());

    let err = execute(&SearchDeps::new(&port), SearchQueryDto::new("cats", 10, 0))
        .await
        .unwrap_err();

    assert_eq!(err, failure);
    assert_eq!(port.calls(), 1);
}

#[tokio::test]
async fn port_validation_errors_are_not_rewritten() {
    let failure = AppError::validation("unsupported filter: color");
    let port = RecordingPort::failing(failure.clone());
    let err = execute(&SearchDeps::new(&port), SearchQueryDto::new("cats", 10, 0))
        .await
        .unwrap_err();
    assert_eq!(err, failure);
}

struct MissingIndexBackend {
    index_path: std::path::PathBuf,
}

#[async_trait]
impl SearchPort for MissingIndexBackend {
    async fn search(&self, query: &SearchQuery) -> search_core::Result<SearchResult> {
        std::fs::read_to_string(&self.index_path).context("load index")?;
        Ok(SearchResult::empty(query.page()))
    }
}

#[tokio::test]
async fn adapters_normalize_their_own_failures() {
    let dir = tempfile::tempdir().unwrap();
    let backend = MissingIndexBackend {
        index_path: dir.path().join("missing.json"),
    };
    let err = execute(&SearchDeps::new(backend), SearchQueryDto::new("cats", 10, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::Internal);
    assert_eq!(err.message(), "load index");
}

#[tokio::test]
async fn use_case_accepts_shared_dyn_ports() {
    let port = Arc::new(RecordingPort::returning(SearchResult::empty(Page::new(1, 0))));
    let shared: Arc<dyn SearchPort> = port.clone();
    let use_case = SearchUseCase::with_config(
        SearchDeps::new(shared),
        SearchConfig {
            log_query_text: true,
        },
    );

    let result = use_case.execute(SearchQueryDto::new("dogs", 1, 0)).await.unwrap();

    assert_eq!(result.page, Page::new(1, 0));
    assert_eq!(port.calls(), 1);
}

#[tokio::test]
async fn concurrent_invocations_are_independent() {
    let port = Arc::new(RecordingPort::returning(SearchResult::empty(Page::new(10, 0))));
    let use_case = Arc::new(SearchUseCase::new(SearchDeps::new(port.clone())));

    let mut handles = Vec::new();
    for i in 0..8_u64 {
        let use_case = Arc::clone(&use_case);
        handles.push(tokio::spawn(async move {
            use_case
                .execute(SearchQueryDto::new(format!("query {i}"), 10, i))
                .await
        }));
    }
    let bad = use_case.execute(SearchQueryDto::new("", 10, 0)).await;

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert!(bad.unwrap_err().is_validation());
    assert_eq!(port.calls(), 8);

    let mut offsets: Vec<u64> = port.queries().iter().map(|q| q.page().offset).collect();
    offsets.sort_unstable();
    assert_eq!(offsets, (0..8).collect::<Vec<_>>());
}
