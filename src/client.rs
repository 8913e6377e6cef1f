//! HTTP Client with builder pattern.
//!
//! Every request goes through [`CacheProxy::select`]: with a cache store
//! configured, GET requests are served from and written to the cache; all
//! other requests reach the transport unchanged.
//!
//! # Example
//!
//! ```rust,ignore
//! use cachenet::cache::MemoryStore;
//! use cachenet::Client;
//! use std::sync::Arc;
//!
//! let client = Client::builder()
//!     .cache_store(Arc::new(MemoryStore::new()))
//!     .build();
//!
//! let resp = client.get("http://example.com/feed")
//!     .query("page", "2")
//!     .send()
//!     .await?;
//! ```

use crate::base::executor::Executor;
use crate::base::neterror::NetError;
use crate::cache::config::{CacheConfig, CacheMode};
use crate::cache::proxy::CacheProxy;
use crate::cache::store::CacheStore;
#[cfg(feature = "json")]
use crate::http::codec::{Codec, JsonCodec};
use crate::http::request::{ConnectionMode, HttpRequestInfo};
use crate::http::response::HttpResponse;
use crate::http::transport::{HyperTransport, Transport};
use bytes::Bytes;
use http::{HeaderName, HeaderValue, Method};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

/// HTTP Client for making requests.
///
/// Use [`Client::builder()`] to configure and create a client. Cloning is
/// cheap and clones share the transport and cache store.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    cache: CacheConfig,
    timeout: Option<Duration>,
    connection: ConnectionMode,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("cache", &self.cache)
            .field("timeout", &self.timeout)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Create a client with the hyper transport and no cache.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn cache_config(&self) -> &CacheConfig {
        &self.cache
    }

    /// Start building a GET request.
    pub fn get<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    /// Start building a POST request.
    pub fn post<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    /// Start building a PUT request.
    pub fn put<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    /// Start building a DELETE request.
    pub fn delete<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }

    /// Start building a HEAD request.
    pub fn head<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::HEAD, url)
    }

    /// Start building a PATCH request.
    pub fn patch<U: AsRef<str>>(&self, url: U) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    /// Start building a request with custom method.
    ///
    /// The request starts out with the client's timeout, connection mode and
    /// cache settings. URL errors surface from `build` or `send`.
    pub fn request<U: AsRef<str>>(&self, method: Method, url: U) -> RequestBuilder {
        let request = HttpRequestInfo::parse(method, url.as_ref()).map(|req| {
            let req = req
                .with_connection(self.connection)
                .with_cache_store(self.cache.store.clone())
                .with_cache_mode(self.cache.mode);
            match self.timeout {
                Some(timeout) => req.with_timeout(timeout),
                None => req,
            }
        });

        RequestBuilder {
            client: self.clone(),
            request,
        }
    }

    /// Execute a prepared request through the cache.
    pub async fn execute(&self, request: HttpRequestInfo) -> Result<HttpResponse, NetError> {
        let proxy = CacheProxy::select(&request, self.cache.reconcile);
        proxy.get(self.transport.as_ref(), &request).await
    }
}

/// Builder for creating a [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    transport: Option<Arc<dyn Transport>>,
    cache: CacheConfig,
    timeout: Option<Duration>,
    connection: ConnectionMode,
}

impl ClientBuilder {
    /// Use a custom transport instead of [`HyperTransport`].
    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the full cache configuration.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Enable caching into `store`, keeping the other cache settings.
    pub fn cache_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.cache.store = Some(store);
        self
    }

    /// Set the default request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the default connection mode.
    pub fn connection(mut self, connection: ConnectionMode) -> Self {
        self.connection = connection;
        self
    }

    /// Build the client.
    pub fn build(self) -> Client {
        Client {
            transport: self
                .transport
                .unwrap_or_else(|| Arc::new(HyperTransport::new())),
            cache: self.cache,
            timeout: self.timeout,
            connection: self.connection,
        }
    }
}

/// Builder for a single request.
///
/// The first error (bad URL, bad header, failed body encoding) is kept and
/// reported by [`build`](Self::build) or [`send`](Self::send).
pub struct RequestBuilder {
    client: Client,
    request: Result<HttpRequestInfo, NetError>,
}

impl RequestBuilder {
    fn map(mut self, f: impl FnOnce(HttpRequestInfo) -> Result<HttpRequestInfo, NetError>) -> Self {
        self.request = self.request.and_then(f);
        self
    }

    /// Set a header, replacing existing values of that name.
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        HeaderValue: TryFrom<V>,
    {
        self.map(|req| {
            let name = HeaderName::try_from(key).map_err(|_| NetError::InvalidHeader)?;
            let value = HeaderValue::try_from(value).map_err(|_| NetError::InvalidHeader)?;
            Ok(req.with_header(name, value))
        })
    }

    /// Append a query parameter.
    pub fn query(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|req| Ok(req.with_parameter(name, value)))
    }

    /// Authenticate with HTTP Basic credentials.
    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.map(|req| Ok(req.with_credentials(username, password)))
    }

    /// Enable or disable TLS certificate verification.
    pub fn tls_verify(self, verify: bool) -> Self {
        self.map(|req| Ok(req.with_tls_verify(verify)))
    }

    /// Override the client's timeout for this request.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.map(|req| Ok(req.with_timeout(timeout)))
    }

    pub fn connection(self, connection: ConnectionMode) -> Self {
        self.map(|req| Ok(req.with_connection(connection)))
    }

    /// Cache this request into `store`.
    pub fn cache_store(self, store: Arc<dyn CacheStore>) -> Self {
        self.map(|req| Ok(req.with_cache_store(Some(store))))
    }

    /// Bypass the cache for this request.
    pub fn no_cache(self) -> Self {
        self.map(|req| Ok(req.with_cache_store(None)))
    }

    pub fn cache_mode(self, mode: CacheMode) -> Self {
        self.map(|req| Ok(req.with_cache_mode(mode)))
    }

    /// Set request body.
    pub fn body(self, body: impl Into<Bytes>) -> Self {
        self.map(|req| Ok(req.with_body(body)))
    }

    /// Set JSON body.
    #[cfg(feature = "json")]
    pub fn json<T: serde::Serialize + ?Sized>(self, json: &T) -> Self {
        self.map(|req| {
            let codec = JsonCodec;
            let body = codec.encode(json)?;
            let content_type = HeaderValue::from_static(codec.content_type());
            Ok(req
                .with_body(body)
                .with_header(http::header::CONTENT_TYPE, content_type))
        })
    }

    /// Finish building without sending.
    pub fn build(self) -> Result<HttpRequestInfo, NetError> {
        self.request
    }

    /// Send the request.
    pub async fn send(self) -> Result<HttpResponse, NetError> {
        let request = self.request?;
        self.client.execute(request).await
    }

    /// Send the request on `executor`; the returned future resolves to the
    /// response.
    pub fn spawn(self, executor: &dyn Executor) -> PendingResponse {
        let (tx, rx) = oneshot::channel();
        executor.execute(Box::pin(async move {
            let _ = tx.send(self.send().await);
        }));
        PendingResponse { rx }
    }
}

/// Response of a request running on an [`Executor`].
///
/// Resolves to [`NetError::Aborted`] if the task is dropped before it
/// finishes.
#[derive(Debug)]
pub struct PendingResponse {
    rx: oneshot::Receiver<Result<HttpResponse, NetError>>,
}

impl Future for PendingResponse {
    type Output = Result<HttpResponse, NetError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(_)) => Poll::Ready(Err(NetError::Aborted)),
            Poll::Pending => Poll::Pending,
        }
    }
}
