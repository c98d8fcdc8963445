//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::metrics::RequestMetrics;
use once_cell::sync::OnceCell;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Request headers, keyed by header name
pub type Headers = BTreeMap<String, String>;

/// HTTP client trait for making HTTP requests
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// POST `body` as JSON to `url` with the given extra headers
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &JsonValue,
    ) -> Result<HttpResponse, HttpError>;
}

/// A fully read HTTP response
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub elapsed: Duration,
    parsed: OnceCell<Option<JsonValue>>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            elapsed,
            parsed: OnceCell::new(),
        }
    }

    /// The body parsed as JSON, or `None` when it is not valid JSON
    pub fn json(&self) -> Option<&JsonValue> {
        self.parsed
            .get_or_init(|| serde_json::from_str(&self.body).ok())
            .as_ref()
    }

    /// Look up a dotted path (`organization.id`) in the JSON body.
    /// JSON `null` is treated as absent.
    pub fn json_path(&self, path: &str) -> Option<&JsonValue> {
        path.split('.')
            .try_fold(self.json()?, |value, key| value.get(key))
            .filter(|value| !value.is_null())
    }

    /// A dotted-path field rendered as a string; numbers are stringified
    pub fn json_string(&self, path: &str) -> Option<String> {
        match self.json_path(path)? {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            JsonValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// HTTP Manager backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    metrics: Option<Arc<RequestMetrics>>,
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {}ms",
            config.timeout.as_millis()
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| HttpError::ConfigError(e.to_string()))?;

        Ok(Self {
            client,
            metrics: None,
        })
    }

    /// Record every request into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<RequestMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn header_map(headers: &Headers) -> Result<HeaderMap, HttpError> {
        let mut header_map = HeaderMap::new();
        for (key, value) in headers {
            let name = HeaderName::from_str(key)
                .map_err(|_| HttpError::InvalidHeaderName(key.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| HttpError::InvalidHeaderValue(key.to_string()))?;
            header_map.insert(name, value);
        }
        Ok(header_map)
    }

    fn record(&self, url: &str, elapsed: Duration, status: u16, size: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.record_request(url, elapsed, status, size);
        }
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn post_json(
        &self,
        url: &str,
        headers: &Headers,
        body: &JsonValue,
    ) -> Result<HttpResponse, HttpError> {
        debug!("POST {} with {} headers", url, headers.len());

        let request = self
            .client
            .post(url)
            .headers(Self::header_map(headers)?)
            .json(body);

        let start = Instant::now();
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                // Status 0 marks a request that never got a response.
                self.record(url, start.elapsed(), 0, 0);
                warn!("Request to {} failed: {}", url, e);
                return Err(HttpError::NetworkError(e));
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                self.record(url, start.elapsed(), status, 0);
                warn!("Failed to read response body from {}: {}", url, e);
                return Err(HttpError::NetworkError(e));
            }
        };
        let elapsed = start.elapsed();

        self.record(url, elapsed, status, text.len());
        debug!(
            "HTTP response received: {} from {} in {}ms",
            status,
            url,
            elapsed.as_millis()
        );

        Ok(HttpResponse::new(status, text, elapsed))
    }
}
