//! Transport capability.
//!
//! A [`Transport`] takes a fully-formed [`HttpRequestInfo`] and produces a
//! buffered [`HttpResponse`]. Everything below that line (sockets, TLS,
//! connection reuse) belongs to the transport; the cache only ever sees
//! whole responses.

use crate::base::neterror::NetError;
use crate::http::request::{ConnectionMode, HttpRequestInfo};
use crate::http::response::HttpResponse;
use bytes::Bytes;
use http::header::{AUTHORIZATION, CONNECTION};
use http::HeaderValue;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::error::Error as StdError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;

/// Alias for the `Future` type returned by a transport.
pub type Transporting = Pin<Box<dyn Future<Output = Result<HttpResponse, NetError>> + Send>>;

/// Sends requests over the network.
///
/// # Design Notes
///
/// - Uses `&self` so one transport can serve concurrent requests.
/// - Returns boxed futures for trait object compatibility.
/// - Connection and timeout failures must surface as connection-range
///   [`NetError`]s (see [`NetError::is_connection_error`]); the cache passes
///   them through untouched.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequestInfo) -> Transporting;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: HttpRequestInfo) -> Transporting {
        (**self).send(request)
    }
}

/// Plaintext HTTP transport on hyper's pooled client.
///
/// Only `http` URLs are accepted; TLS transports plug in through
/// [`Transport`].
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
        }
    }
}

impl Transport for HyperTransport {
    fn send(&self, request: HttpRequestInfo) -> Transporting {
        let client = self.client.clone();
        Box::pin(async move {
            let http_request = build_request(&request)?;
            tracing::debug!(
                method = %request.method(),
                uri = %http_request.uri(),
                "sending request"
            );

            let exchange = async {
                let response = client
                    .request(http_request)
                    .await
                    .map_err(|e| map_client_error(&e))?;
                let (parts, body) = response.into_parts();
                let body = body
                    .collect()
                    .await
                    .map_err(|_| NetError::HttpBodyError)?
                    .to_bytes();
                Ok::<_, NetError>(HttpResponse::from_parts(
                    parts.status,
                    parts.version,
                    parts.headers,
                    body,
                ))
            };

            match request.options().timeout {
                Some(limit) => tokio::time::timeout(limit, exchange)
                    .await
                    .map_err(|_| NetError::ConnectionTimedOut)?,
                None => exchange.await,
            }
        })
    }
}

/// Convert a request description into a hyper request.
fn build_request(request: &HttpRequestInfo) -> Result<http::Request<Full<Bytes>>, NetError> {
    let url = request.full_url();
    if url.scheme() != "http" {
        return Err(NetError::DisallowedUrlScheme);
    }

    let body = request.body().cloned().unwrap_or_default();
    let mut req = http::Request::builder()
        .method(request.method().clone())
        .uri(url.as_str())
        .body(Full::new(body))
        .map_err(|_| NetError::InvalidUrl)?;

    *req.headers_mut() = request.headers().clone();

    // Explicit Authorization headers win over credentials
    if let Some(credentials) = request.credentials() {
        if !req.headers().contains_key(AUTHORIZATION) {
            let value = HeaderValue::from_str(&credentials.to_header_value())
                .map_err(|_| NetError::InvalidHeader)?;
            req.headers_mut().insert(AUTHORIZATION, value);
        }
    }

    if request.options().connection == ConnectionMode::Close {
        req.headers_mut()
            .insert(CONNECTION, HeaderValue::from_static("close"));
    }

    Ok(req)
}

fn map_client_error(err: &hyper_util::client::legacy::Error) -> NetError {
    let kind = io_error_kind(err);
    if err.is_connect() {
        return connect_error(kind);
    }
    if let Some(hyper_err) = find_source::<hyper::Error>(err) {
        if hyper_err.is_parse() {
            return NetError::InvalidHttpResponse;
        }
        if hyper_err.is_incomplete_message() {
            return NetError::EmptyResponse;
        }
    }
    stream_error(kind)
}

/// Failure while establishing the connection.
fn connect_error(kind: Option<io::ErrorKind>) -> NetError {
    match kind {
        Some(io::ErrorKind::ConnectionRefused) => NetError::ConnectionRefused,
        Some(io::ErrorKind::TimedOut) => NetError::ConnectionTimedOut,
        Some(io::ErrorKind::AddrNotAvailable) => NetError::AddressUnreachable,
        _ => NetError::ConnectionFailed,
    }
}

/// Failure on an established connection.
fn stream_error(kind: Option<io::ErrorKind>) -> NetError {
    match kind {
        Some(io::ErrorKind::ConnectionReset) => NetError::ConnectionReset,
        Some(io::ErrorKind::ConnectionAborted) => NetError::ConnectionAborted,
        Some(io::ErrorKind::NotConnected) => NetError::SocketNotConnected,
        _ => NetError::ConnectionClosed,
    }
}

/// First error of type `E` in a source chain.
fn find_source<'a, E: StdError + 'static>(err: &'a (dyn StdError + 'static)) -> Option<&'a E> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(found) = e.downcast_ref::<E>() {
            return Some(found);
        }
        current = e.source();
    }
    None
}

/// Find the first IO error in a source chain.
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    find_source::<io::Error>(err).map(io::Error::kind)
}
