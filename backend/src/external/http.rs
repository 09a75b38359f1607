//! Outbound HTTP with a fixed retry budget
//!
//! A request is attempted up to `max_attempts` times with a constant delay in
//! between. Only transport failures and `500` responses consume an attempt;
//! every other status is handed back to the caller to classify.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use thiserror::Error;

/// Options for a single logical request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub url: String,
    pub body: Option<Vec<u8>>,
    pub headers: Vec<(String, String)>,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
}

impl RequestOptions {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            headers: Vec::new(),
            max_attempts: 1,
            retry_delay: Duration::ZERO,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts;
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

/// Response returned by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure (connect, timeout, body read)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error returned once the retry budget is spent
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request failed after {attempts} attempts{}", describe_last(.last_error))]
    Exhausted {
        attempts: u32,
        /// Most recent transport failure. `None` when every attempt got a 500.
        #[source]
        last_error: Option<TransportError>,
    },
}

fn describe_last(last_error: &Option<TransportError>) -> String {
    last_error
        .as_ref()
        .map(|err| format!(": {}", err))
        .unwrap_or_default()
}

/// Executes one attempt of a request
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, options: &RequestOptions) -> Result<HttpResponse, TransportError>;
}

/// Production transport backed by reqwest
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, options: &RequestOptions) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(options.method.clone(), options.url.as_str())
            .timeout(options.request_timeout);

        for (name, value) in &options.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::new(format!("request timeout: {}", e))
            } else if e.is_connect() {
                TransportError::new(format!("connection failed: {}", e))
            } else {
                TransportError::new(format!("request failed: {}", e))
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

/// Send a request, retrying transport failures and `500` responses.
///
/// Any other status, including 4xx and other 5xx codes, returns immediately.
/// Retries do not look at the method.
pub async fn send_with_retry(
    transport: &dyn HttpTransport,
    options: &RequestOptions,
) -> Result<HttpResponse, RequestError> {
    let max_attempts = options.max_attempts;
    let mut last_error = None;

    for attempt in 1..=max_attempts {
        match transport.execute(options).await {
            Ok(response) if response.status != 500 => return Ok(response),
            Ok(response) => {
                tracing::warn!(
                    attempt,
                    max_attempts,
                    status = response.status,
                    "Request failed with server error"
                );
            }
            Err(err) => {
                tracing::warn!(attempt, max_attempts, error = %err, "Request failed");
                last_error = Some(err);
            }
        }

        if attempt < max_attempts {
            tokio::time::sleep(options.retry_delay).await;
        }
    }

    Err(RequestError::Exhausted {
        attempts: max_attempts,
        last_error,
    })
}
