// Generic request/response transport used by the Stripe flows.
// One request in, one status + body out. No retries here.

use async_trait::async_trait;
use http::Method;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const DEFAULT_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: u16,
    pub response_text: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("client build error: {0}")]
    Build(String),
    #[error("request error: {0}")]
    Request(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("body read error: {0}")]
    Body(String),
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, url: &str, options: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// reqwest-backed transport with rustls and a whole-request timeout.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    http: Client,
}

impl ReqwestClient {
    pub fn new(timeout_ms: u64) -> Result<Self, TransportError> {
        let timeout = Duration::from_millis(if timeout_ms > 0 { timeout_ms } else { DEFAULT_TIMEOUT_MS });
        let http = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { http })
    }

    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, url: &str, options: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut req = self.http.request(options.method.clone(), url);
        for (name, value) in &options.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if !options.body.is_empty() {
            req = req.body(options.body);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::Request(e.to_string())
            }
        })?;
        let status_code = resp.status().as_u16();
        let response_text = resp.text().await.map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(
            method = %options.method,
            status = status_code,
            body_len = response_text.len(),
            "transport response"
        );

        Ok(HttpResponse {
            status_code,
            response_text,
        })
    }
}
