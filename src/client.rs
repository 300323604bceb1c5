use reqwest::blocking::{Client, ClientBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::BackendCause;

/// Content type of every request body sent to the remote service
pub const JSON_API_CONTENT_TYPE: &str = "application/vnd.api+json";

/// Create the default HTTP client for store requests
/// with settings for connection pooling and timeouts
pub fn create_rest_client() -> reqwest::Result<Client> {
    ClientBuilder::new()
        .pool_max_idle_per_host(50)
        .timeout(Duration::from_secs(300)) // 5 minutes
        .connect_timeout(Duration::from_secs(10))
        .build()
}

/// Status and raw body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpReply {
            status,
            body: body.into(),
        }
    }

    /// Any status below the client/server error boundary
    pub fn is_success(&self) -> bool {
        self.status < 300
    }

    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// One round-trip to the remote service.
///
/// Implementations must be safe to share between threads; the store calls
/// `send` once per operation and never retries.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<HttpReply, BackendCause>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<HttpReply, BackendCause> {
        (**self).send(method, url, token, body)
    }
}

/// Blocking transport backed by a pooled reqwest client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> reqwest::Result<Self> {
        Ok(HttpTransport {
            client: create_rest_client()?,
        })
    }

    /// Reuse an existing client (and its connection pool)
    pub fn with_client(client: Client) -> Self {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<HttpReply, BackendCause> {
        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(token)
            .header(CONTENT_TYPE, JSON_API_CONTENT_TYPE);

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let start = Instant::now();
        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;

        tracing::debug!(
            "{} {} => {:?} (status: {})",
            method,
            url,
            start.elapsed(),
            status
        );

        Ok(HttpReply::new(status.as_u16(), body))
    }
}
