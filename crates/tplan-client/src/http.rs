use crate::transport::{Method, Transport, TransportError};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::fmt::{Debug, Formatter};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://platform.segmentapis.com";
pub const DEFAULT_API_VERSION: &str = "v1beta";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Clone, PartialEq, Eq)]
pub struct HttpEndpoint {
    pub base_url: String,
    pub api_version: String,
    pub access_token: String,
    pub timeout_ms: u64,
}

impl HttpEndpoint {
    pub fn new(access_token: impl Into<String>) -> Result<Self, HttpEndpointError> {
        let endpoint = Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            access_token: access_token.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        };
        endpoint.validate()?;
        Ok(endpoint)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, HttpEndpointError> {
        self.base_url = base_url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_api_version(
        mut self,
        api_version: impl Into<String>,
    ) -> Result<Self, HttpEndpointError> {
        self.api_version = api_version.into();
        self.validate()?;
        Ok(self)
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Result<Self, HttpEndpointError> {
        self.timeout_ms = timeout_ms;
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), HttpEndpointError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(HttpEndpointError::InvalidBaseUrl(self.base_url.clone()));
        }
        if self.api_version.is_empty() || self.api_version.contains('/') {
            return Err(HttpEndpointError::InvalidApiVersion(self.api_version.clone()));
        }
        if self.access_token.trim().is_empty() {
            return Err(HttpEndpointError::MissingAccessToken);
        }
        if self.timeout_ms == 0 {
            return Err(HttpEndpointError::InvalidTimeout(self.timeout_ms));
        }
        Ok(())
    }

    /// `{base_url}/{api_version}{path}`; `path` starts with `/`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_version,
            path
        )
    }
}

impl Debug for HttpEndpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpEndpoint")
            .field("base_url", &self.base_url)
            .field("api_version", &self.api_version)
            .field("access_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HttpEndpointError {
    #[error("invalid base url, expected http(s): {0}")]
    InvalidBaseUrl(String),
    #[error("invalid api version `{0}`")]
    InvalidApiVersion(String),
    #[error("access token must not be empty")]
    MissingAccessToken,
    #[error("invalid timeout_ms, expected > 0: {0}")]
    InvalidTimeout(u64),
    #[error("build http client failed: {0}")]
    Client(String),
}

/// Blocking HTTP transport authenticating with a bearer token.
pub struct HttpTransport {
    endpoint: HttpEndpoint,
    client: Client,
}

impl HttpTransport {
    pub fn new(endpoint: HttpEndpoint) -> Result<Self, HttpEndpointError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(endpoint.timeout_ms))
            .build()
            .map_err(|error| HttpEndpointError::Client(error.to_string()))?;
        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &HttpEndpoint {
        &self.endpoint
    }
}

impl Transport for HttpTransport {
    fn do_request(
        &self,
        method: Method,
        path: &str,
        body: Option<&[u8]>,
    ) -> Result<Vec<u8>, TransportError> {
        let url = self.endpoint.url(path);
        let mut request = self
            .client
            .request(reqwest_method(method), url.as_str())
            .bearer_auth(&self.endpoint.access_token)
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request
            .send()
            .map_err(|error| self.classify(method, path, error))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .map_err(|error| self.classify(method, path, error))?;
        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            bytes = bytes.len(),
            "http response"
        );

        if !status.is_success() {
            return Err(TransportError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }
}

impl HttpTransport {
    fn classify(&self, method: Method, path: &str, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                method,
                path: path.to_string(),
                timeout_ms: self.endpoint.timeout_ms,
            };
        }
        TransportError::Connection {
            method,
            path: path.to_string(),
            reason: error.to_string(),
        }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
