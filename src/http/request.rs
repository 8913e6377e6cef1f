//! Request description handed to transports and the cache.
//!
//! Chromium mapping: net/http/http_request_info.h
//!
//! An [`HttpRequestInfo`] is a value: every modifier consumes it and returns
//! a new one, so a request can be shared, cloned into a conditional variant,
//! or sent to a transport without anyone observing a later change.

use crate::base::neterror::NetError;
use crate::cache::config::CacheMode;
use crate::cache::store::CacheStore;
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Username and password for HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Generate the Authorization header value.
    pub fn to_header_value(&self) -> String {
        use base64::{engine::general_purpose, Engine as _};
        let creds = format!("{}:{}", self.username, self.password);
        format!("Basic {}", general_purpose::STANDARD.encode(creds))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Whether the transport should keep the connection open after the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionMode {
    #[default]
    KeepAlive,
    /// Send `Connection: close`.
    Close,
}

/// Per-request options that never change which resource is fetched.
///
/// None of these fields take part in the cache key.
#[derive(Clone, Default)]
pub struct RequestOptions {
    /// Transport timeout for the whole exchange.
    pub timeout: Option<Duration>,
    pub connection: ConnectionMode,
    /// Store consulted by the cache proxy (`None` disables caching).
    pub cache_store: Option<Arc<dyn CacheStore>>,
    pub cache_mode: CacheMode,
}

impl fmt::Debug for RequestOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestOptions")
            .field("timeout", &self.timeout)
            .field("connection", &self.connection)
            .field("cache_store", &self.cache_store.is_some())
            .field("cache_mode", &self.cache_mode)
            .finish()
    }
}

/// A fully-formed HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequestInfo {
    method: Method,
    url: Url,
    parameters: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Bytes>,
    credentials: Option<Credentials>,
    tls_verify: bool,
    options: RequestOptions,
}

impl HttpRequestInfo {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            parameters: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            credentials: None,
            tls_verify: true,
            options: RequestOptions::default(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Parse an absolute URL and create a request for it.
    pub fn parse(method: Method, url: &str) -> Result<Self, NetError> {
        let url = Url::parse(url).map_err(|_| NetError::InvalidUrl)?;
        if url.cannot_be_a_base() {
            return Err(NetError::InvalidUrl);
        }
        Ok(Self::new(method, url))
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Append a query parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push((name.into(), value.into()));
        self
    }

    /// Set a header, replacing any existing values of that name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header from strings.
    pub fn try_with_header(self, name: &str, value: &str) -> Result<Self, NetError> {
        let name = HeaderName::from_str(name).map_err(|_| NetError::InvalidHeader)?;
        let value = HeaderValue::from_str(value).map_err(|_| NetError::InvalidHeader)?;
        Ok(self.with_header(name, value))
    }

    /// Merge headers: each name in `headers` replaces all existing values of
    /// that name, other headers are kept.
    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        for name in headers.keys() {
            self.headers.remove(name);
            for value in headers.get_all(name) {
                self.headers.append(name.clone(), value.clone());
            }
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    /// Enable or disable TLS certificate verification.
    pub fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn with_connection(mut self, connection: ConnectionMode) -> Self {
        self.options.connection = connection;
        self
    }

    /// Set or clear the cache store for this request.
    pub fn with_cache_store(mut self, store: Option<Arc<dyn CacheStore>>) -> Self {
        self.options.cache_store = store;
        self
    }

    pub fn with_cache_mode(mut self, mode: CacheMode) -> Self {
        self.options.cache_mode = mode;
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    pub fn options(&self) -> &RequestOptions {
        &self.options
    }

    /// URL with the request parameters appended to its query.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(self.parameters.iter());
        }
        url
    }
}
