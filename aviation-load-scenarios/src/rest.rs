//! JSON calls against the organization/authentication REST service

use crate::context::ScenarioContext;
use aviation_load_http::{Headers, HttpResponse};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Join a service base URL with an absolute REST path
pub(crate) fn rest_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// POST `body` with `Content-Type` and `Accept` set to JSON on top of `extra`.
///
/// Transport failures are logged and yield `None`; callers record them as
/// failed checks.
pub(crate) async fn post(
    ctx: &ScenarioContext,
    url: &str,
    extra: Headers,
    body: &JsonValue,
) -> Option<HttpResponse> {
    let mut headers = extra;
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    headers.insert("Accept".to_string(), "application/json".to_string());

    match ctx.http.post_json(url, &headers, body).await {
        Ok(response) => Some(response),
        Err(e) => {
            warn!(url, "REST request failed: {}", e);
            None
        }
    }
}

/// Status and a present dotted-path field, the shape of every REST check
pub(crate) fn status_with_field(response: Option<&HttpResponse>, status: u16, field: &str) -> bool {
    response.is_some_and(|r| r.status == status && r.json_path(field).is_some())
}
