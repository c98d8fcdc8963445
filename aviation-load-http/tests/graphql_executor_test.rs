//! GraphQL executor against a stub endpoint

use aviation_load_http::graphql::{CHECK_HAS_JSON, CHECK_NO_ERRORS, CHECK_STATUS_200};
use aviation_load_http::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Ping;

#[derive(Serialize)]
struct PingVariables {
    id: String,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PingData {
    ping_by_id: Option<PingNode>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct PingNode {
    id: String,
}

impl GraphqlDocument for Ping {
    const OPERATION_NAME: &'static str = "Ping";
    const QUERY: &'static str = "query Ping($id: ID!) { pingById(id: $id) { id } }";
    type Variables = PingVariables;
    type Data = PingData;
}

fn variables() -> PingVariables {
    PingVariables {
        id: "p-1".to_string(),
    }
}

fn passes(checks: &CheckRegistry, name: &str) -> (u64, u64) {
    let summary = checks.get(name).expect("check was recorded");
    (summary.passes, summary.fails)
}

#[tokio::test]
async fn test_successful_query_sends_envelope_and_headers() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("content-type", "application/json"))
        .and(header("x-org-id", "org-1"))
        .and(body_partial_json(json!({
            "query": Ping::QUERY,
            "variables": {"id": "p-1"}
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"pingById": {"id": "p-1"}}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let metrics = Arc::new(RequestMetrics::new());
    let http = HttpManager::new().unwrap().with_metrics(metrics.clone());
    let checks = CheckRegistry::new();
    let executor = GraphqlExecutor::new(&http, &checks);

    let mut headers = Headers::new();
    headers.insert("x-org-id".to_string(), "org-1".to_string());

    let outcome = executor
        .execute::<Ping>(&format!("{}/graphql", server.uri()), &variables(), &headers)
        .await;

    assert_eq!(
        outcome,
        GraphqlOutcome::Ok {
            data: PingData {
                ping_by_id: Some(PingNode {
                    id: "p-1".to_string()
                })
            }
        }
    );
    assert_eq!(passes(&checks, CHECK_STATUS_200), (1, 0));
    assert_eq!(passes(&checks, CHECK_HAS_JSON), (1, 0));
    assert_eq!(passes(&checks, CHECK_NO_ERRORS), (1, 0));
    assert_eq!(metrics.total_requests(), 1);
}

#[tokio::test]
async fn test_graphql_errors_keep_partial_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"pingById": null},
            "errors": [{"message": "Ping not found", "path": ["pingById"]}]
        })))
        .mount(&server)
        .await;

    let http = HttpManager::new().unwrap();
    let checks = CheckRegistry::new();
    let executor = GraphqlExecutor::new(&http, &checks);

    let outcome = executor
        .execute::<Ping>(&server.uri(), &variables(), &Headers::new())
        .await;

    match outcome {
        GraphqlOutcome::Errors {
            errors,
            partial_data,
        } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "Ping not found");
            assert_eq!(partial_data, Some(PingData { ping_by_id: None }));
        }
        other => panic!("expected Errors outcome, got {:?}", other),
    }
    assert_eq!(passes(&checks, CHECK_STATUS_200), (1, 0));
    assert_eq!(passes(&checks, CHECK_HAS_JSON), (1, 0));
    assert_eq!(passes(&checks, CHECK_NO_ERRORS), (0, 1));
}

#[tokio::test]
async fn test_empty_errors_array_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"pingById": {"id": "p-1"}},
            "errors": []
        })))
        .mount(&server)
        .await;

    let http = HttpManager::new().unwrap();
    let checks = CheckRegistry::new();
    let outcome = GraphqlExecutor::new(&http, &checks)
        .execute::<Ping>(&server.uri(), &variables(), &Headers::new())
        .await;

    assert!(outcome.is_ok());
    assert_eq!(passes(&checks, CHECK_NO_ERRORS), (1, 0));
}

#[tokio::test]
async fn test_non_json_response_is_recorded_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let http = HttpManager::new().unwrap();
    let checks = CheckRegistry::new();
    let outcome = GraphqlExecutor::new(&http, &checks)
        .execute::<Ping>(&server.uri(), &variables(), &Headers::new())
        .await;

    assert_eq!(
        outcome,
        GraphqlOutcome::Failed {
            status: Some(502),
            reason: "response body is not JSON".to_string()
        }
    );
    assert_eq!(passes(&checks, CHECK_STATUS_200), (0, 1));
    assert_eq!(passes(&checks, CHECK_HAS_JSON), (0, 1));
}

#[tokio::test]
async fn test_connection_failure_is_recorded_not_raised() {
    let config = HttpConfig {
        timeout: Duration::from_secs(2),
        ..HttpConfig::default()
    };
    let metrics = Arc::new(RequestMetrics::new());
    let http = HttpManager::with_config(config)
        .unwrap()
        .with_metrics(metrics.clone());
    let checks = CheckRegistry::new();

    // Port 9 (discard) is not expected to accept connections in test environments.
    let outcome = GraphqlExecutor::new(&http, &checks)
        .execute::<Ping>("http://127.0.0.1:9/graphql", &variables(), &Headers::new())
        .await;

    assert!(matches!(outcome, GraphqlOutcome::Failed { status: None, .. }));
    assert_eq!(passes(&checks, CHECK_STATUS_200), (0, 1));
    let summary = metrics.summary(Duration::from_secs(1));
    assert_eq!(summary.failed_requests, 1);
    assert_eq!(summary.status_codes.get(&0), Some(&1));
}

#[tokio::test]
async fn test_data_survives_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"data": {"pingById": {"id": "p-1"}}})),
        )
        .mount(&server)
        .await;

    let http = HttpManager::new().unwrap();
    let checks = CheckRegistry::new();
    let outcome = GraphqlExecutor::new(&http, &checks)
        .execute::<Ping>(&server.uri(), &variables(), &Headers::new())
        .await;

    assert_eq!(
        outcome.into_data(),
        Some(PingData {
            ping_by_id: Some(PingNode {
                id: "p-1".to_string()
            })
        })
    );
    assert_eq!(passes(&checks, CHECK_STATUS_200), (0, 1));
    assert_eq!(passes(&checks, CHECK_HAS_JSON), (1, 0));
    assert_eq!(passes(&checks, CHECK_NO_ERRORS), (1, 0));
}
