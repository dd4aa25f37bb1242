//! Wavefront HTTP client.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Proxy, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::transport::{ApiRequest, Transport};
use crate::users::Users;

/// Connection settings for a Wavefront instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host (e.g. "example.wavefront.com") or full base URL.
    pub address: String,
    /// API token sent as a bearer credential.
    pub token: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
    /// Optional proxy for all requests.
    pub http_proxy: Option<String>,
    /// Accept invalid TLS certificates.
    pub skip_tls_verify: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            token: String::new(),
            timeout_secs: 30,
            http_proxy: None,
            skip_tls_verify: false,
        }
    }
}

impl ClientConfig {
    /// Config for `address` authenticated with `token`.
    pub fn new(address: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            token: token.into(),
            ..Default::default()
        }
    }
}

/// Client for communicating with the Wavefront API.
#[derive(Clone)]
pub struct WavefrontClient {
    /// HTTP client.
    client: Client,
    /// Base URL every API path is resolved against.
    base_url: Url,
    /// API token.
    token: String,
}

impl fmt::Debug for WavefrontClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WavefrontClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl WavefrontClient {
    /// Create a new Wavefront client.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let base_url = parse_base_url(&config.address)?;

        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Some(proxy) = config.http_proxy.as_deref().filter(|p| !p.is_empty()) {
            builder = builder.proxy(Proxy::all(proxy)?);
        }
        if config.skip_tls_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: config.token.clone(),
        })
    }

    /// Base URL of the Wavefront instance.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// User operations backed by this client.
    pub fn users(&self) -> Users {
        Users::new(Arc::new(self.clone()))
    }
}

#[async_trait]
impl Transport for WavefrontClient {
    fn new_request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Vec<u8>>,
    ) -> ApiResult<ApiRequest> {
        ApiRequest::new(&self.base_url, method, path, query, body)
    }

    async fn execute(&self, request: ApiRequest) -> ApiResult<Bytes> {
        let ApiRequest { method, url, body } = request;
        debug!(method = %method, url = %url, "sending wavefront request");

        let mut builder = self
            .client
            .request(method, url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "wavefront response");

        if !status.is_success() {
            return Err(status_error(status, response.text().await));
        }

        Ok(response.bytes().await?)
    }
}

/// Error for a non-success response, keeping the body text when it can be read.
fn status_error(status: StatusCode, body: reqwest::Result<String>) -> ApiError {
    let message = match body {
        Ok(text) => text,
        Err(e) => format!("<unreadable body: {e}>"),
    };
    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Bare hosts are reached over HTTPS.
fn parse_base_url(address: &str) -> ApiResult<Url> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Wavefront address is not set".to_string(),
        ));
    }

    let full = if address.contains("://") {
        format!("{address}/")
    } else {
        format!("https://{address}/")
    };
    Url::parse(&full)
        .map_err(|e| ApiError::InvalidRequest(format!("invalid address {address}: {e}")))
}
