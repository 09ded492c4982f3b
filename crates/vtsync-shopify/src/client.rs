//! HTTP client for the Shopify Admin API (GraphQL and REST).
//!
//! Every request carries the access token, is paced by the configured fixed
//! delay, and is retried on throttling and transient failures. HTTP 429 and
//! GraphQL `THROTTLED` errors are turned into typed errors here so the retry
//! layer never inspects message text.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::time::Instant;
use vtsync_core::ShopifyConfig;

use crate::error::ShopifyError;
use crate::retry::retry_with_backoff;
use crate::types::GraphQlEnvelope;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Fallback wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Longest response body kept in an error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

pub struct AdminClient {
    client: Client,
    /// `{store}/admin/api/{version}` without a trailing slash.
    api_base: String,
    access_token: String,
    location_id: Option<String>,
    max_retries: u32,
    backoff_base_ms: u64,
    request_delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl AdminClient {
    /// Creates a client for the store in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ShopifyError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`ShopifyError::InvalidBaseUrl`] for a malformed store URL.
    pub fn new(config: &ShopifyConfig) -> Result<Self, ShopifyError> {
        Self::with_base_url(config, &config.store_url)
    }

    /// Creates a client that talks to `base_url` instead of the configured
    /// store (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`AdminClient::new`].
    pub fn with_base_url(config: &ShopifyConfig, base_url: &str) -> Result<Self, ShopifyError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ShopifyError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            api_base: format!("{trimmed}/admin/api/{}", config.api_version),
            access_token: config.access_token.clone(),
            location_id: config.location_id.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            request_delay: Duration::from_millis(config.request_delay_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Inventory location as a GraphQL gid, when one is configured.
    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        self.location_id.as_deref()
    }

    /// Numeric location id for REST calls.
    #[must_use]
    pub fn location_numeric_id(&self) -> Option<&str> {
        self.location_id
            .as_deref()
            .and_then(|gid| gid.rsplit('/').next())
    }

    /// Runs one GraphQL document and deserializes its `data` into `T`.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::Throttled`] / [`ShopifyError::RateLimited`] after
    ///   retries are exhausted
    /// - [`ShopifyError::GraphQl`] for other top-level errors
    /// - [`ShopifyError::Deserialize`] when `data` has an unexpected shape
    pub(crate) async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T, ShopifyError> {
        let url = format!("{}/graphql.json", self.api_base);
        let body = json!({ "query": query, "variables": variables });

        let data = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let body = body.clone();
            async move {
                let request = self.client.post(&url).json(&body);
                let text = self.execute(request, &url).await?;
                let envelope: GraphQlEnvelope =
                    serde_json::from_str(&text).map_err(|e| ShopifyError::Deserialize {
                        context: operation.to_owned(),
                        source: e,
                    })?;
                check_graphql_errors(&envelope)?;
                envelope.data.ok_or(ShopifyError::MissingField {
                    operation,
                    field: "data",
                })
            }
        })
        .await?;

        serde_json::from_value(data).map_err(|e| ShopifyError::Deserialize {
            context: operation.to_owned(),
            source: e,
        })
    }

    /// Sends one REST request under `/admin/api/{version}/` and deserializes
    /// the JSON response.
    ///
    /// # Errors
    ///
    /// - [`ShopifyError::RateLimited`] after retries are exhausted
    /// - [`ShopifyError::UnexpectedStatus`] for any other non-2xx status
    /// - [`ShopifyError::Deserialize`] when the body does not match `T`
    pub(crate) async fn rest<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, ShopifyError> {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));

        let text = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let method = method.clone();
            async move {
                let mut request = self.client.request(method, &url).query(query);
                if let Some(body) = body {
                    request = request.json(body);
                }
                self.execute(request, &url).await
            }
        })
        .await?;

        serde_json::from_str(&text).map_err(|e| ShopifyError::Deserialize {
            context: format!("{method} {path}"),
            source: e,
        })
    }

    /// Paces, authenticates and sends a request, mapping non-2xx statuses to
    /// typed errors. Returns the response body.
    async fn execute(&self, request: RequestBuilder, url: &str) -> Result<String, ShopifyError> {
        self.pace().await;

        let response = request
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ShopifyError::RateLimited { retry_after_secs });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ShopifyError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }
        Ok(body)
    }

    /// Sleeps until `request_delay` has passed since the previous request.
    async fn pace(&self) {
        if self.request_delay.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.request_delay {
                tokio::time::sleep(self.request_delay - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Shopify sends `Retry-After: 2.0`; whole seconds are also accepted.
fn parse_retry_after(raw: &str) -> Option<u64> {
    let secs: f64 = raw.trim().parse().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(secs.ceil() as u64)
}

fn check_graphql_errors(envelope: &GraphQlEnvelope) -> Result<(), ShopifyError> {
    if envelope.errors.is_empty() {
        return Ok(());
    }
    if envelope.errors.iter().any(|e| e.code() == Some("THROTTLED")) {
        return Err(ShopifyError::Throttled);
    }
    let messages = envelope
        .errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    Err(ShopifyError::GraphQl(messages))
}
