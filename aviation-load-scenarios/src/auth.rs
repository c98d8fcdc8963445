//! Login, user registration, token verification and refresh against the auth service

use crate::context::ScenarioContext;
use crate::error::ScenarioError;
use crate::organization::{create_organization, EMAIL_DOMAIN};
use crate::random::ValueGenerator;
use crate::rest::{self, rest_url};
use aviation_load_http::Headers;
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

pub const CHECK_LOGIN: &str = "login successful";
pub const CHECK_USER_CREATED: &str = "user created";
pub const CHECK_TOKEN_VALID: &str = "token is valid";
pub const CHECK_TOKENS_REFRESHED: &str = "tokens refreshed";

/// Run the full authentication flow against the auth service at `base_url`.
///
/// Every step runs regardless of earlier check failures. When login yields no
/// token the later requests go out malformed (empty bearer, empty `{}`
/// verify and refresh bodies). They are sent as is, not corrected.
///
/// Returns the access token issued at login, not the refreshed one.
pub async fn run_authentication_scenario(
    ctx: &ScenarioContext,
    random: &mut ValueGenerator,
    base_url: &str,
) -> Result<Option<String>, ScenarioError> {
    let identity = create_organization(ctx, random, base_url).await?;
    let org_headers = org_scoped(&identity.organization.id);

    let login = rest::post(
        ctx,
        &rest_url(base_url, "/api/auth/login/"),
        org_headers.clone(),
        &json!({
            "username": identity.admin.username,
            "password": identity.admin.password,
        }),
    )
    .await;
    ctx.check(CHECK_LOGIN, rest::status_with_field(login.as_ref(), 200, "access"));

    let access_token = login.as_ref().and_then(|r| r.json_string("access"));
    let refresh_token = login
        .as_ref()
        .and_then(|r| r.json_path("refresh"))
        .cloned();
    if access_token.is_none() {
        warn!(organization_id = %identity.organization.id, "Login returned no access token");
    }

    let mut bearer = Headers::new();
    bearer.insert(
        "Authorization".to_string(),
        format!("Bearer {}", access_token.as_deref().unwrap_or_default()),
    );
    let registration = rest::post(
        ctx,
        &rest_url(base_url, "/api/users/create/"),
        bearer,
        &json!({
            "username": random.string(8),
            "password": random.password(),
            "email": random.email(EMAIL_DOMAIN),
        }),
    )
    .await;
    ctx.check(
        CHECK_USER_CREATED,
        rest::status_with_field(registration.as_ref(), 201, "access"),
    );

    let verification = rest::post(
        ctx,
        &rest_url(base_url, "/api/auth/verify-token/"),
        org_headers.clone(),
        &body_with("token", access_token.clone().map(JsonValue::String)),
    )
    .await;
    ctx.check(
        CHECK_TOKEN_VALID,
        verification
            .as_ref()
            .is_some_and(|r| r.status == 200 && r.json_path("valid").is_some_and(is_truthy)),
    );

    let refresh = rest::post(
        ctx,
        &rest_url(base_url, "/api/auth/refresh/"),
        org_headers,
        &body_with("refresh", refresh_token),
    )
    .await;
    ctx.check(
        CHECK_TOKENS_REFRESHED,
        rest::status_with_field(refresh.as_ref(), 200, "access"),
    );

    debug!(
        organization_id = %identity.organization.id,
        has_token = access_token.is_some(),
        "Authentication scenario finished"
    );

    Ok(access_token)
}

fn org_scoped(org_id: &str) -> Headers {
    let mut headers = Headers::new();
    headers.insert("X-Org-Id".to_string(), org_id.to_string());
    headers
}

/// Single-field JSON object; an absent value leaves the key out
fn body_with(key: &str, value: Option<JsonValue>) -> JsonValue {
    let mut body = serde_json::Map::new();
    if let Some(value) = value {
        body.insert(key.to_string(), value);
    }
    JsonValue::Object(body)
}

fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}
