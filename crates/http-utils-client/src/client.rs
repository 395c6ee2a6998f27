//! Asynchronous HTTP transport built on `reqwest`.

use crate::request::{parse_method, Header, PreparedRequest};
use crate::response::{map_status_to_error, RawResponse};
use crate::Result;
use async_trait::async_trait;
use http_utils_core::config::TransportConfig;
use http_utils_core::Error;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("http-utils/", env!("CARGO_PKG_VERSION"));

/// Something that can execute a prepared request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and read the full response body.
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse>;
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Clone, Default)]
pub struct HttpTransportBuilder {
    config: TransportConfig,
}

impl HttpTransportBuilder {
    /// Create a builder with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: TransportConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the request timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config = self.config.with_timeout(seconds);
        self
    }

    /// Set the User-Agent header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config = self.config.with_user_agent(user_agent);
        self
    }

    /// Build the transport.
    pub fn build(self) -> Result<HttpTransport> {
        self.config.check()?;

        let user_agent = self.config.user_agent.as_deref().unwrap_or(USER_AGENT);
        let mut builder = ClientBuilder::new()
            .timeout(self.config.timeout())
            .connect_timeout(self.config.connect_timeout())
            .user_agent(user_agent);

        if !self.config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build HTTP client: {err}"))
        })?;

        Ok(HttpTransport {
            http,
            config: self.config,
        })
    }
}

/// Transport that sends requests with a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Create a transport with the default configuration.
    pub fn new() -> Result<Self> {
        HttpTransportBuilder::new().build()
    }

    /// Start building a transport.
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: PreparedRequest) -> Result<RawResponse> {
        let started = Instant::now();
        let (method, url, headers, body, timeout) = request.into_parts();

        if self.config.enable_logging {
            info!(%method, %url, "HTTP request");
        }

        let mut builder = self.http.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|err| logged(Error::from(err)))?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| logged(Error::from(err)))?;

        debug!(
            %method,
            %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed = ?started.elapsed(),
            "HTTP response"
        );

        Ok(RawResponse::new(status, response_headers, bytes))
    }
}

fn logged(err: Error) -> Error {
    if err.should_log() {
        warn!(code = err.error_code(), "HTTP request failed: {err}");
    }
    err
}

/// Execute a request and decode a successful JSON response.
///
/// A non-2xx status becomes an error: 404 maps to [`Error::NotFound`], 400 and
/// 422 to [`Error::BadRequest`], 429 and 5xx to [`Error::ServiceUnavailable`],
/// and anything else to [`Error::UnexpectedStatus`].
pub async fn request_json<T, R>(transport: &T, request: PreparedRequest) -> Result<R>
where
    T: Transport + ?Sized,
    R: DeserializeOwned,
{
    let response = transport.execute(request).await?;
    if !response.is_success() {
        return Err(map_status_to_error(response.status(), response.text()));
    }
    response.json()
}

/// Issue a single request with a freshly built default transport.
///
/// `method` is an HTTP method name (`""` means `GET`). `headers` replaces the
/// default JSON headers when given, and `extra_headers` are applied after them.
/// The response is returned whatever its status.
pub async fn http_request<B>(
    method: &str,
    payload: Option<&B>,
    url: &str,
    headers: Option<&[Header]>,
    extra_headers: Option<&[Header]>,
) -> Result<RawResponse>
where
    B: Serialize + ?Sized,
{
    let method = parse_method(method)?;
    let request = PreparedRequest::new(method, url, payload, headers, extra_headers)?;
    HttpTransport::new()?.execute(request).await
}
