//! GraphQL request execution
//!
//! Every call records three independent checks (`status is 200`,
//! `response has JSON`, `no GraphQL errors`) and never fails: transport
//! problems and GraphQL errors are folded into a [`GraphqlOutcome`] so the
//! calling scenario can carry on with whatever data came back.

use crate::checks::CheckRegistry;
use crate::client::{Headers, HttpClient};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, error, warn};

pub const CHECK_STATUS_200: &str = "status is 200";
pub const CHECK_HAS_JSON: &str = "response has JSON";
pub const CHECK_NO_ERRORS: &str = "no GraphQL errors";

/// A typed query or mutation document
pub trait GraphqlDocument {
    /// Operation name, used for logging
    const OPERATION_NAME: &'static str;

    /// Printed document text sent as `query`
    const QUERY: &'static str;

    type Variables: Serialize + Send + Sync;
    type Data: DeserializeOwned + Send;
}

/// One entry of a GraphQL `errors` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphqlErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonValue>,
}

/// Result of executing one document
#[derive(Debug, Clone, PartialEq)]
pub enum GraphqlOutcome<T> {
    /// No errors, `data` present and well-shaped. A non-200 status is
    /// reported through the `status is 200` check only.
    Ok { data: T },
    /// The server answered with a non-empty `errors` array
    Errors {
        errors: Vec<GraphqlErrorDetail>,
        partial_data: Option<T>,
    },
    /// No usable GraphQL envelope: network failure, non-JSON body or
    /// missing `data`
    Failed { status: Option<u16>, reason: String },
}

impl<T> GraphqlOutcome<T> {
    /// Whatever data is available, full or partial
    pub fn data(&self) -> Option<&T> {
        match self {
            GraphqlOutcome::Ok { data } => Some(data),
            GraphqlOutcome::Errors { partial_data, .. } => partial_data.as_ref(),
            GraphqlOutcome::Failed { .. } => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            GraphqlOutcome::Ok { data } => Some(data),
            GraphqlOutcome::Errors { partial_data, .. } => partial_data,
            GraphqlOutcome::Failed { .. } => None,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, GraphqlOutcome::Ok { .. })
    }
}

/// Executes typed GraphQL documents over an [`HttpClient`], recording checks
pub struct GraphqlExecutor<'a> {
    http: &'a dyn HttpClient,
    checks: &'a CheckRegistry,
}

impl<'a> GraphqlExecutor<'a> {
    pub fn new(http: &'a dyn HttpClient, checks: &'a CheckRegistry) -> Self {
        Self { http, checks }
    }

    /// POST `{query, variables}` to `url` with `headers` plus `Content-Type: application/json`
    pub async fn execute<D: GraphqlDocument>(
        &self,
        url: &str,
        variables: &D::Variables,
        headers: &Headers,
    ) -> GraphqlOutcome<D::Data> {
        let mut headers = headers.clone();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let body = json!({
            "query": D::QUERY,
            "variables": variables,
        });

        debug!(operation = D::OPERATION_NAME, url, "executing GraphQL document");

        let response = match self.http.post_json(url, &headers, &body).await {
            Ok(response) => response,
            Err(e) => {
                self.checks.check(CHECK_STATUS_200, false);
                self.checks.check(CHECK_HAS_JSON, false);
                self.checks.check(CHECK_NO_ERRORS, false);
                warn!(operation = D::OPERATION_NAME, url, "GraphQL request failed: {}", e);
                return GraphqlOutcome::Failed {
                    status: None,
                    reason: e.to_string(),
                };
            }
        };

        self.checks.check(CHECK_STATUS_200, response.status == 200);

        let Some(envelope) = response.json() else {
            self.checks.check(CHECK_HAS_JSON, false);
            self.checks.check(CHECK_NO_ERRORS, false);
            warn!(
                operation = D::OPERATION_NAME,
                status = response.status,
                "GraphQL response is not JSON"
            );
            return GraphqlOutcome::Failed {
                status: Some(response.status),
                reason: "response body is not JSON".to_string(),
            };
        };
        self.checks.check(CHECK_HAS_JSON, true);

        let raw_errors = envelope.get("errors").filter(|e| has_entries(e));
        self.checks.check(CHECK_NO_ERRORS, raw_errors.is_none());

        let data = envelope
            .get("data")
            .filter(|d| !d.is_null())
            .and_then(|d| match serde_json::from_value::<D::Data>(d.clone()) {
                Ok(data) => Some(data),
                Err(e) => {
                    warn!(
                        operation = D::OPERATION_NAME,
                        "GraphQL data has unexpected shape: {}", e
                    );
                    None
                }
            });

        if let Some(raw_errors) = raw_errors {
            error!(
                operation = D::OPERATION_NAME,
                errors = %raw_errors,
                body = %response.body,
                "GraphQL errors"
            );
            return GraphqlOutcome::Errors {
                errors: parse_errors(raw_errors),
                partial_data: data,
            };
        }

        match data {
            Some(data) => {
                if response.status != 200 {
                    warn!(
                        operation = D::OPERATION_NAME,
                        status = response.status,
                        "GraphQL data returned with unexpected status"
                    );
                }
                GraphqlOutcome::Ok { data }
            }
            None => GraphqlOutcome::Failed {
                status: Some(response.status),
                reason: "response carried no data".to_string(),
            },
        }
    }
}

fn has_entries(errors: &JsonValue) -> bool {
    match errors {
        JsonValue::Null => false,
        JsonValue::Array(entries) => !entries.is_empty(),
        _ => true,
    }
}

fn parse_errors(raw: &JsonValue) -> Vec<GraphqlErrorDetail> {
    serde_json::from_value(raw.clone()).unwrap_or_else(|_| {
        vec![GraphqlErrorDetail {
            message: raw.to_string(),
            path: None,
            extensions: None,
        }]
    })
}
