//! Conditional request construction.
//!
//! A stale entry with a validator is revalidated with a GET carrying
//! `If-None-Match` and/or `If-Modified-Since`. The conditional request never
//! carries a cache store, so sending it cannot re-enter the cache proxy.

use crate::base::neterror::NetError;
use crate::http::request::HttpRequestInfo;
use crate::http::response::HttpResponse;
use http::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use http::{HeaderMap, Method};

/// Build the conditional GET that revalidates `cached`.
///
/// All headers of `original` are kept; the conditional headers are added on
/// top. Returns [`NetError::CacheEntryNotSuitable`] when `cached` has no
/// validator. That is a caller bug: check
/// [`is_validatable`](crate::cache::freshness::is_validatable) first.
pub fn build_validation_request(
    cached: &HttpResponse,
    original: &HttpRequestInfo,
) -> Result<HttpRequestInfo, NetError> {
    let conditional = conditional_headers(cached);
    if conditional.is_empty() {
        return Err(NetError::CacheEntryNotSuitable);
    }

    Ok(original
        .clone()
        .with_method(Method::GET)
        .with_headers(&conditional)
        .with_cache_store(None))
}

/// `If-Modified-Since` / `If-None-Match` derived from the stored validators.
fn conditional_headers(cached: &HttpResponse) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(last_modified) = cached.headers().get(LAST_MODIFIED) {
        headers.insert(IF_MODIFIED_SINCE, last_modified.clone());
    }

    if let Some(etag) = cached.headers().get(ETAG) {
        headers.insert(IF_NONE_MATCH, etag.clone());
    }

    headers
}
