use reqwest::blocking::Client;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{
    DEFAULT_DELAY_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

const ACCESS_DENIED: u16 = 403;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// For `Transport` implementations not built on reqwest.
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: String,
    },
}

/// Raw status and body of one GET.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// The network seam. `HttpTransport` is the real one; tests plug in a fake.
pub trait Transport {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<RawResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;
        let status = response.status().as_u16();
        let body = response.text().map_err(|source| TransportError::Request {
            url: url.to_string(),
            source,
        })?;

        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl FetchRequest {
    /// A GET for `url` carrying the browser-like User-Agent the site expects.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_user_agent(url, DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(url: impl Into<String>, user_agent: &str) -> Self {
        Self {
            url: url.into(),
            headers: vec![("User-Agent".to_string(), user_agent.to_string())],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub delay: Duration,
    pub success_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
            success_statuses: vec![200, 202],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Page(String),
    /// The server answered 403. Callers carry on with zero records.
    AccessDenied,
}

pub fn fetch_with_retry(
    transport: &dyn Transport,
    request: &FetchRequest,
    policy: &RetryPolicy,
) -> Result<FetchOutcome, FetchError> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last = String::new();

    for attempt in 1..=max_attempts {
        debug!(url = %request.url, attempt, "fetching");

        match transport.get(&request.url, &request.headers, policy.timeout) {
            Ok(response) if response.status == ACCESS_DENIED => {
                warn!(url = %request.url, "access denied: 403 Forbidden");
                return Ok(FetchOutcome::AccessDenied);
            }
            Ok(response)
                if policy.success_statuses.contains(&response.status)
                    && !response.body.trim().is_empty() =>
            {
                info!(url = %request.url, attempt, bytes = response.body.len(), "fetched page");
                return Ok(FetchOutcome::Page(response.body));
            }
            Ok(response) => {
                last = if response.body.trim().is_empty() {
                    format!("status {} with empty body", response.status)
                } else {
                    format!("unexpected status {}", response.status)
                };
            }
            Err(e) => last = e.to_string(),
        }

        warn!(url = %request.url, attempt, max_attempts, reason = %last, "fetch attempt failed");
        if attempt < max_attempts {
            thread::sleep(policy.delay);
        }
    }

    Err(FetchError::Exhausted {
        url: request.url.clone(),
        attempts: max_attempts,
        last,
    })
}
