//! HTTP requests with a timeout and bounded linear-backoff retries.

use crate::config::ApiConfig;
use crate::defaults;
use crate::error::{MeetlineError, Result};
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use tracing::{debug, warn};

/// How many times to try a request and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero behaves like one.
    pub max_retries: u32,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Wait before retry `n` is `n * backoff_step`.
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::MAX_RETRIES,
            timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            backoff_step: Duration::from_millis(defaults::BACKOFF_STEP_MS),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            timeout: config.timeout(),
            backoff_step: config.backoff_step(),
        }
    }

    /// Delay after failed attempt `attempt` (1-based). Linear, no jitter.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_step.saturating_mul(attempt)
    }

    fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }
}

/// A request description that can be re-issued on every attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(url: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Issue one attempt of `request`.
async fn send_once(
    client: &reqwest::Client,
    request: &ApiRequest,
    timeout: Duration,
) -> Result<reqwest::Response> {
    let mut builder = client
        .request(request.method.clone(), &request.url)
        .timeout(timeout);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
        builder = builder
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(body)?);
    }

    builder.send().await.map_err(|e| {
        if e.is_timeout() {
            MeetlineError::Timeout {
                url: request.url.clone(),
                timeout,
            }
        } else if e.is_builder() {
            // Malformed URL or header; retrying cannot help.
            MeetlineError::Other(format!("Invalid request to {}: {e}", request.url))
        } else {
            MeetlineError::Request {
                message: format!("{} {}: {e}", request.method, request.url),
            }
        }
    })
}

/// Send `request`, retrying on `502 Bad Gateway` and transport failures.
///
/// Attempts run from 1 to `policy.max_retries`. After a retryable failure on
/// attempt `n` (and if attempts remain) the call sleeps `n * backoff_step`.
/// Any non-502 response is returned as-is, successful or not; the caller
/// inspects the status. When the budget is spent the last failure is
/// returned: the transport error, or [`MeetlineError::HttpStatus`] for a
/// final 502.
pub async fn make_api_call(
    client: &reqwest::Client,
    request: &ApiRequest,
    policy: &RetryPolicy,
) -> Result<reqwest::Response> {
    let attempts = policy.attempts();
    let mut attempt = 1;

    loop {
        let error = match send_once(client, request, policy.timeout).await {
            Ok(response) if response.status().as_u16() != defaults::RETRYABLE_STATUS => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status().as_u16(),
                    attempt,
                    "Request completed"
                );
                return Ok(response);
            }
            Ok(response) => MeetlineError::HttpStatus {
                status: response.status().as_u16(),
                url: request.url.clone(),
            },
            Err(e) => e,
        };

        if attempt >= attempts || !error.is_retryable() {
            return Err(error);
        }

        let delay = policy.backoff_delay(attempt);
        warn!(
            url = %request.url,
            attempt,
            max_attempts = attempts,
            delay_ms = delay.as_millis() as u64,
            "Request failed, retrying: {error}"
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

/// A shared HTTP client bundled with its retry policy and credentials.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    policy: RetryPolicy,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            policy,
            token: None,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(RetryPolicy::from_config(config)).with_token(config.token.clone())
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send through [`make_api_call`], adding the bearer token when configured.
    pub async fn send(&self, request: ApiRequest) -> Result<reqwest::Response> {
        let request = match &self.token {
            Some(token) => request.header(AUTHORIZATION.as_str(), format!("Bearer {token}")),
            None => request,
        };
        make_api_call(&self.http, &request, &self.policy).await
    }
}
