//! Scenarios and entry points against stub services

use aviation_load_config::EndpointsConfig;
use aviation_load_http::{CheckRegistry, HttpManager};
use aviation_load_scenarios::aircraft::{CHECK_AIRCRAFT_CREATED, CHECK_AIRCRAFT_READ_BACK};
use aviation_load_scenarios::auth::{
    CHECK_LOGIN, CHECK_TOKENS_REFRESHED, CHECK_TOKEN_VALID, CHECK_USER_CREATED,
};
use aviation_load_scenarios::entry::{FlightsEntry, RouterEntry};
use aviation_load_scenarios::flights::{CHECK_FLIGHT_AIRCRAFT, CHECK_FLIGHT_CREATED};
use aviation_load_scenarios::organization::CHECK_ORGANIZATION_CREATED;
use aviation_load_scenarios::*;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{
    body_json, body_partial_json, body_string_contains, header, header_exists, method, path,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Context with every endpoint pointing at `server`
fn context(server: &MockServer) -> ScenarioContext {
    let uri = server.uri();
    let endpoints = EndpointsConfig {
        flight_service_url: format!("{}/flights/graphql", uri),
        aircraft_service_url: format!("{}/aircraft/graphql", uri),
        router_url: format!("{}/router", uri),
        gateway_url: format!("{}/gateway", uri),
        auth_service_url: uri,
    };
    ScenarioContext::new(
        Arc::new(HttpManager::new().unwrap()),
        Arc::new(CheckRegistry::new()),
        Arc::new(endpoints),
    )
}

fn counts(ctx: &ScenarioContext, name: &str) -> (u64, u64) {
    ctx.checks
        .get(name)
        .map(|c| (c.passes, c.fails))
        .unwrap_or((0, 0))
}

fn graphql_ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

async fn mount_organization(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/organizations/create/"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "organization": {"id": 17, "name": "org_x", "schema_name": "org_x"},
            "admin_user": {"id": 3, "username": "admin"}
        })))
        .mount(server)
        .await;
}

async fn mount_auth_service(server: &MockServer) {
    mount_organization(server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(header("x-org-id", "17"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access": "access-1", "refresh": "refresh-1"})),
        )
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/create/"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"access": "access-2"})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-token/"))
        .and(body_partial_json(json!({"token": "access-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"valid": true})))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_partial_json(json!({"refresh": "refresh-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "access-3"})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_aircraft_scenario_returns_created_id_after_three_calls() {
    let server = MockServer::start().await;
    let ctx = context(&server);

    // Read-after-write lookup; mounted first so it wins over the generic miss
    Mock::given(method("POST"))
        .and(body_string_contains("getAircraftById"))
        .and(body_partial_json(json!({"variables": {"id": "abc123"}})))
        .respond_with(graphql_ok(json!({
            "getAircraftById": {"id": "abc123", "registration": "N12345", "status": "AVAILABLE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("getAircraftById"))
        .respond_with(graphql_ok(json!({"getAircraftById": null})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("createAircraft"))
        .and(body_partial_json(json!({"variables": {"input": {
            "manufacturer": "Boeing",
            "model": "737",
            "capacity": 50,
            "status": "AVAILABLE",
            "yearOfManufacture": 2020
        }}})))
        .respond_with(graphql_ok(json!({
            "createAircraft": {"id": "abc123", "registration": "N12345"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let target = ScenarioTarget::resolve(ctx.endpoints.aircraft_service_url.clone(), &ctx.endpoints);
    let mut random = ValueGenerator::seeded(1);
    let id = run_aircraft_scenario(&ctx, &mut random, &target, AuthContext::anonymous()).await;

    assert_eq!(id.as_deref(), Some("abc123"));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
    assert_eq!(counts(&ctx, CHECK_AIRCRAFT_CREATED), (1, 0));
    assert_eq!(counts(&ctx, CHECK_AIRCRAFT_READ_BACK), (1, 0));

    // The create call carried a well-formed registration
    let registration = Regex::new(r#""registration":"N\d{5}""#).unwrap();
    let requests = server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .any(|r| registration.is_match(&String::from_utf8_lossy(&r.body))));
}

#[tokio::test]
async fn test_aircraft_scenario_without_id_skips_read_back() {
    let server = MockServer::start().await;
    let ctx = context(&server);

    Mock::given(method("POST"))
        .and(body_string_contains("getAircraftById"))
        .respond_with(graphql_ok(json!({"getAircraftById": null})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("createAircraft"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createAircraft": null},
            "errors": [{"message": "registration already exists"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let target = ScenarioTarget::resolve(ctx.endpoints.aircraft_service_url.clone(), &ctx.endpoints);
    let mut random = ValueGenerator::seeded(2);
    let id = run_aircraft_scenario(&ctx, &mut random, &target, AuthContext::anonymous()).await;

    assert!(id.is_none());
    assert_eq!(counts(&ctx, CHECK_AIRCRAFT_CREATED), (0, 1));
    assert!(ctx.checks.get(CHECK_AIRCRAFT_READ_BACK).is_none());
}

#[tokio::test]
async fn test_flight_scenario_binds_aircraft() {
    let server = MockServer::start().await;
    let ctx = context(&server);

    Mock::given(method("POST"))
        .and(body_string_contains("getFlightById"))
        .and(body_partial_json(json!({"variables": {"id": "f-9"}})))
        .respond_with(graphql_ok(json!({
            "getFlightById": {"id": "f-9", "number": "BA100", "status": "SCHEDULED", "aircraft": {"id": "a-1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("getFlightById"))
        .respond_with(graphql_ok(json!({"getFlightById": null})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("createFlight"))
        .and(body_partial_json(json!({"variables": {
            "aircraftId": "a-1",
            "origin": "LHR",
            "destination": "JFK"
        }})))
        .respond_with(graphql_ok(json!({"createFlight": {"id": "f-9", "aircraft": {"id": "a-1"}}})))
        .expect(1)
        .mount(&server)
        .await;

    let target = ScenarioTarget::resolve(ctx.endpoints.flight_service_url.clone(), &ctx.endpoints);
    let mut random = ValueGenerator::seeded(3);
    let id = run_flight_scenario(&ctx, &mut random, &target, "a-1", AuthContext::anonymous()).await;

    assert_eq!(id.as_deref(), Some("f-9"));
    assert_eq!(counts(&ctx, CHECK_FLIGHT_CREATED), (1, 0));
    assert_eq!(counts(&ctx, CHECK_FLIGHT_AIRCRAFT), (1, 0));
}

#[tokio::test]
async fn test_authentication_scenario_returns_login_token() {
    let server = MockServer::start().await;
    mount_auth_service(&server).await;
    let ctx = context(&server);

    let mut random = ValueGenerator::seeded(4);
    let token = run_authentication_scenario(&ctx, &mut random, &server.uri())
        .await
        .unwrap();

    // The pre-refresh token, not "access-3"
    assert_eq!(token.as_deref(), Some("access-1"));
    for check in [
        CHECK_ORGANIZATION_CREATED,
        CHECK_LOGIN,
        CHECK_USER_CREATED,
        CHECK_TOKEN_VALID,
        CHECK_TOKENS_REFRESHED,
    ] {
        assert_eq!(counts(&ctx, check), (1, 0), "check {}", check);
    }
}

#[tokio::test]
async fn test_authentication_scenario_continues_without_token() {
    let server = MockServer::start().await;
    mount_organization(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "bad credentials"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/users/create/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/verify-token/"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"valid": false})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh/"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(400))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let mut random = ValueGenerator::seeded(5);
    let token = run_authentication_scenario(&ctx, &mut random, &server.uri())
        .await
        .unwrap();

    assert!(token.is_none());
    assert_eq!(counts(&ctx, CHECK_LOGIN), (0, 1));
    assert_eq!(counts(&ctx, CHECK_TOKEN_VALID), (0, 1));
    assert_eq!(counts(&ctx, CHECK_TOKENS_REFRESHED), (0, 1));
}

#[tokio::test]
async fn test_provisioning_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/organizations/create/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "organization": {"id": 5}
        })))
        .mount(&server)
        .await;

    let ctx = context(&server);
    let mut random = ValueGenerator::seeded(6);
    let err = create_organization(&ctx, &mut random, &server.uri())
        .await
        .unwrap_err();

    assert!(matches!(err, ScenarioError::Provisioning(_)));
    assert!(err.to_string().contains("organization.schema_name"));
    // 201 with an id still satisfies the check itself
    assert_eq!(counts(&ctx, CHECK_ORGANIZATION_CREATED), (1, 0));
}

#[tokio::test]
async fn test_provisioned_identity_keeps_generated_credentials() {
    let server = MockServer::start().await;
    mount_organization(&server).await;
    let ctx = context(&server);

    let mut random = ValueGenerator::seeded(7);
    let identity = create_organization(&ctx, &mut random, &server.uri())
        .await
        .unwrap();

    assert_eq!(identity.organization.id, "17");
    assert_eq!(identity.organization.schema_name, "org_x");
    assert_eq!(identity.admin.id, "3");
    assert!(identity.organization.name.starts_with("org_"));
    assert_eq!(identity.admin.username.len(), 8);
    assert!(Regex::new(r"^[a-z]{6}\d{4}$")
        .unwrap()
        .is_match(&identity.admin.password));
    assert!(identity.admin.email.ends_with("@mycompany.com"));

    let requests = server.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["admin"]["password"], identity.admin.password);
    assert_eq!(sent["name"], sent["schema_name"]);
}

#[tokio::test]
async fn test_router_skips_flight_when_aircraft_creation_fails() {
    let server = MockServer::start().await;
    mount_organization(&server).await;

    Mock::given(method("POST"))
        .and(path("/router"))
        .and(body_string_contains("getAircraftById"))
        .respond_with(graphql_ok(json!({"getAircraftById": null})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/router"))
        .and(body_string_contains("createAircraft"))
        .and(header("x-org-id", "17"))
        .and(header("x-user-sub", "3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("Flight"))
        .respond_with(graphql_ok(json!({"createFlight": {"id": "never"}})))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let entry = RouterEntry;
    let mut random = ValueGenerator::seeded(8);
    let fixture = entry.setup(&ctx, &mut random).await.unwrap();
    assert!(fixture.identity.is_some());

    entry.iteration(&ctx, &mut random, &fixture).await.unwrap();
    assert_eq!(counts(&ctx, CHECK_AIRCRAFT_CREATED), (0, 1));
    assert!(ctx.checks.get(CHECK_FLIGHT_CREATED).is_none());
}

#[tokio::test]
async fn test_flights_entry_without_aircraft_never_calls_flight_service() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(graphql_ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let mut random = ValueGenerator::seeded(9);
    FlightsEntry
        .iteration(&ctx, &mut random, &Fixture::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_gateway_sends_bearer_token_only() {
    let server = MockServer::start().await;
    mount_auth_service(&server).await;

    // Identity headers must never reach the gateway
    Mock::given(method("POST"))
        .and(path("/gateway"))
        .and(header_exists("x-org-id"))
        .respond_with(ResponseTemplate::new(400))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gateway"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_string_contains("createAircraft"))
        .respond_with(graphql_ok(json!({"createAircraft": {"id": "g-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gateway"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_string_contains("getAircraftById"))
        .respond_with(graphql_ok(json!({"getAircraftById": {"id": "g-1"}})))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gateway"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_string_contains("createFlight"))
        .and(body_partial_json(json!({"variables": {"aircraftId": "g-1"}})))
        .respond_with(graphql_ok(json!({"createFlight": {"id": "gf-1"}})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/gateway"))
        .and(body_string_contains("getFlightById"))
        .respond_with(graphql_ok(json!({"getFlightById": {"id": "gf-1", "aircraft": {"id": "g-1"}}})))
        .expect(2)
        .mount(&server)
        .await;

    let ctx = context(&server);
    let entry = EntryPointKind::Gateway.entry_point();
    let mut random = ValueGenerator::seeded(10);
    let fixture = entry.setup(&ctx, &mut random).await.unwrap();
    assert_eq!(fixture, Fixture::default());

    entry.iteration(&ctx, &mut random, &fixture).await.unwrap();
    assert_eq!(counts(&ctx, CHECK_FLIGHT_CREATED), (1, 0));
}
