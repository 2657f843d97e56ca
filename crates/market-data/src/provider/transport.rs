//! HTTP transport used by the adapters.
//!
//! Adapters only need "GET this URL and give me status + body". Keeping that
//! behind [`HttpTransport`] lets tests feed canned upstream payloads without a
//! network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client};
use serde_json::Value;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::ProviderId;

/// A single outbound GET.
#[derive(Clone, Debug)]
pub struct FetchRequest {
    /// Provider issuing the request, used for error attribution
    pub provider: ProviderId,

    /// Absolute URL
    pub url: String,

    /// Query string parameters, appended in order
    pub query: Vec<(String, String)>,

    /// Whether to send `Accept: application/json`
    pub accept_json: bool,

    /// Upper bound for the whole request, connect through body
    pub timeout: Duration,
}

impl FetchRequest {
    pub fn new(provider: ProviderId, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            provider,
            url: url.into(),
            query: Vec::new(),
            accept_json: false,
            timeout,
        }
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn accept_json(mut self) -> Self {
        self.accept_json = true;
        self
    }
}

/// Status and raw body of an upstream response.
#[derive(Clone, Debug)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }

    /// Checks the status and decodes the body as a JSON object.
    pub fn into_json(self, provider: ProviderId) -> Result<Value, MarketDataError> {
        if !self.is_ok() {
            return Err(MarketDataError::HttpStatus {
                provider: provider.to_string(),
                status: self.status,
            });
        }

        let document: Value =
            serde_json::from_str(&self.body).map_err(|e| MarketDataError::Decode {
                provider: provider.to_string(),
                message: e.to_string(),
            })?;

        if !document.is_object() {
            return Err(MarketDataError::Decode {
                provider: provider.to_string(),
                message: "expected a JSON object at the top level".to_string(),
            });
        }

        Ok(document)
    }
}

/// Performs GET requests on behalf of an adapter.
///
/// Implementations report transport failures (connection, timeout) as errors
/// and hand back every response that arrived, whatever its status.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, MarketDataError>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
///
/// The client owns its connection pool; dropping the transport releases it.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder().build().unwrap_or_else(|_| Client::new()),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: FetchRequest) -> Result<FetchResponse, MarketDataError> {
        debug!(
            provider = request.provider,
            url = %request.url,
            params = request.query.len(),
            "Upstream request"
        );

        let mut builder = self
            .client
            .get(&request.url)
            .timeout(request.timeout)
            .query(&request.query);

        if request.accept_json {
            builder = builder.header(ACCEPT, "application/json");
        }

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                MarketDataError::Timeout {
                    provider: request.provider.to_string(),
                }
            } else {
                MarketDataError::Network(e)
            }
        };

        let response = builder.send().await.map_err(map_err)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_err)?;

        Ok(FetchResponse { status, body })
    }
}
