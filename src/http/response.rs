//! Buffered HTTP response.
//!
//! This is both what transports return and what cache stores hold. The body
//! is fully read into [`Bytes`], so cloning a response is cheap and a stored
//! copy never shares mutable state with the one handed to the caller.

use crate::base::neterror::NetError;
use crate::cache::freshness;
use crate::http::codec::{media_type, Codec};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, StatusCode, Version};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// HTTP response with an in-memory body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    received_at: OffsetDateTime,
}

impl HttpResponse {
    /// Create an empty response received now.
    pub fn new(status: StatusCode) -> Self {
        Self::from_parts(status, Version::HTTP_11, HeaderMap::new(), Bytes::new())
    }

    pub fn from_parts(
        status: StatusCode,
        version: Version,
        headers: HeaderMap,
        body: Bytes,
    ) -> Self {
        Self {
            status,
            version,
            headers,
            body,
            received_at: OffsetDateTime::now_utc(),
        }
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

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Override the retrieval time.
    pub fn with_received_at(mut self, received_at: OffsetDateTime) -> Self {
        self.received_at = received_at;
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Get the body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// When this response was received from the network.
    pub fn received_at(&self) -> OffsetDateTime {
        self.received_at
    }

    pub(crate) fn set_received_at(&mut self, received_at: OffsetDateTime) {
        self.received_at = received_at;
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, NetError> {
        String::from_utf8(self.body.to_vec()).map_err(|_| NetError::InvalidUtf8)
    }

    /// Decode the body with `codec`.
    ///
    /// Fails with [`NetError::UnsupportedContentType`] when the response
    /// declares a `Content-Type` the codec does not handle. A response
    /// without `Content-Type` is decoded as-is.
    pub fn decode<T: DeserializeOwned, C: Codec>(&self, codec: &C) -> Result<T, NetError> {
        if let Some(value) = self.headers.get(CONTENT_TYPE) {
            let content_type = value.to_str().map_err(|_| NetError::InvalidHeader)?;
            if !codec.accepts(content_type) {
                return Err(NetError::unsupported_content_type(media_type(
                    content_type,
                )));
            }
        }
        codec.decode(&self.body)
    }

    /// Convenience method to decode the body as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NetError> {
        self.decode(&crate::http::codec::JsonCodec)
    }

    /// See [`freshness::is_cacheable`].
    pub fn is_cacheable(&self) -> bool {
        freshness::is_cacheable(self, OffsetDateTime::now_utc())
    }

    /// See [`freshness::is_expired`].
    pub fn is_expired(&self) -> bool {
        freshness::is_expired(self, OffsetDateTime::now_utc())
    }

    /// See [`freshness::is_validatable`].
    pub fn is_validatable(&self) -> bool {
        freshness::is_validatable(self)
    }

    /// See [`freshness::freshness_lifetime`].
    pub fn freshness_lifetime(&self) -> Duration {
        freshness::freshness_lifetime(self)
    }

    /// Serialize for byte-oriented cache backends.
    ///
    /// Header values and the body are kept as raw bytes, so obs-text values
    /// survive the round trip.
    pub fn to_bytes(&self) -> Result<Vec<u8>, NetError> {
        use base64::{engine::general_purpose, Engine as _};

        let headers = self
            .headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    general_purpose::STANDARD.encode(value.as_bytes()),
                )
            })
            .collect();

        let stored = StoredResponse {
            status: self.status.as_u16(),
            version: version_label(self.version).to_string(),
            headers,
            body: general_purpose::STANDARD.encode(&self.body),
            received_at: self.received_at,
        };

        serde_json::to_vec(&stored).map_err(|e| NetError::cache_write_failed(e.to_string()))
    }

    /// Inverse of [`to_bytes`](Self::to_bytes).
    ///
    /// Any malformed input yields [`NetError::CacheChecksumMismatch`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, NetError> {
        use base64::{engine::general_purpose, Engine as _};

        let stored: StoredResponse =
            serde_json::from_slice(bytes).map_err(|_| NetError::CacheChecksumMismatch)?;

        let status =
            StatusCode::from_u16(stored.status).map_err(|_| NetError::CacheChecksumMismatch)?;

        let mut headers = HeaderMap::with_capacity(stored.headers.len());
        for (name, value) in stored.headers {
            let name =
                HeaderName::from_str(&name).map_err(|_| NetError::CacheChecksumMismatch)?;
            let value = general_purpose::STANDARD
                .decode(value)
                .ok()
                .and_then(|raw| HeaderValue::from_bytes(&raw).ok())
                .ok_or(NetError::CacheChecksumMismatch)?;
            headers.append(name, value);
        }

        let body = general_purpose::STANDARD
            .decode(stored.body)
            .map_err(|_| NetError::CacheChecksumMismatch)?;

        Ok(Self {
            status,
            version: parse_version(&stored.version),
            headers,
            body: Bytes::from(body),
            received_at: stored.received_at,
        })
    }
}

/// Wire form of a cached response.
#[derive(Serialize, Deserialize)]
struct StoredResponse {
    status: u16,
    version: String,
    /// Header names with base64-encoded values.
    headers: Vec<(String, String)>,
    body: String,
    #[serde(with = "time::serde::timestamp")]
    received_at: OffsetDateTime,
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_09 {
        "HTTP/0.9"
    } else if version == Version::HTTP_10 {
        "HTTP/1.0"
    } else if version == Version::HTTP_2 {
        "HTTP/2.0"
    } else if version == Version::HTTP_3 {
        "HTTP/3.0"
    } else {
        "HTTP/1.1"
    }
}

fn parse_version(label: &str) -> Version {
    match label {
        "HTTP/0.9" => Version::HTTP_09,
        "HTTP/1.0" => Version::HTTP_10,
        "HTTP/2.0" => Version::HTTP_2,
        "HTTP/3.0" => Version::HTTP_3,
        _ => Version::HTTP_11,
    }
}
