//! Body (de)serialization.
//!
//! A [`Codec`] turns typed values into request bodies and response bodies
//! back into typed values. The cache never decodes bodies; decoding happens
//! on demand through [`HttpResponse::decode`](crate::http::HttpResponse::decode).

use crate::base::neterror::NetError;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encoder/decoder for one media type.
pub trait Codec: Send + Sync {
    /// Media type written to `Content-Type` for encoded bodies.
    fn content_type(&self) -> &'static str;

    /// Serialize a value into a request body.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, NetError>;

    /// Deserialize a response body.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, NetError>;

    /// Whether a response `Content-Type` can be handled by this codec.
    ///
    /// Parameters such as `charset` are ignored.
    fn accepts(&self, content_type: &str) -> bool {
        media_type(content_type).eq_ignore_ascii_case(self.content_type())
    }
}

/// Strip parameters from a `Content-Type` value.
pub(crate) fn media_type(content_type: &str) -> &str {
    content_type.split(';').next().unwrap_or("").trim()
}

/// JSON codec backed by `serde_json`.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Bytes, NetError> {
        serde_json::to_vec(value)
            .map(Bytes::from)
            .map_err(|_| NetError::BodyEncodingFailed)
    }

    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, NetError> {
        serde_json::from_slice(body).map_err(|_| NetError::JsonParseError)
    }

    fn accepts(&self, content_type: &str) -> bool {
        let media = media_type(content_type).to_ascii_lowercase();
        // application/problem+json and friends
        media == "application/json" || media.ends_with("+json")
    }
}
