//! Freshness evaluation for stored responses.
//!
//! Everything here is recomputed from the response headers on each call;
//! nothing is cached on the response itself. Functions take `now` explicitly
//! so callers (and tests) control the clock.
//!
//! When both `max-age` and an `Expires` date are present, `max-age` wins.

use crate::cache::control::CacheControl;
use crate::http::date::parse_http_date;
use crate::http::response::HttpResponse;
use http::header::{DATE, ETAG, EXPIRES, LAST_MODIFIED};
use time::{Duration, OffsetDateTime};

/// Whether a response may be written to the cache.
///
/// Requires a 2xx status, neither `no-cache` nor `no-store`, and, when
/// Cache-Control carries an `Expires` fragment, an expiry strictly in the
/// future. An `Expires` fragment that fails to parse counts as past.
pub fn is_cacheable(response: &HttpResponse, now: OffsetDateTime) -> bool {
    if !response.status().is_success() {
        return false;
    }

    let cc = CacheControl::from_headers(response.headers());
    if cc.no_cache() || cc.no_store() {
        return false;
    }

    if cc.has_expires() {
        return cc.expires().is_some_and(|at| at > now);
    }

    true
}

/// Whether the response carries a validator (`ETag` or `Last-Modified`).
pub fn is_validatable(response: &HttpResponse) -> bool {
    let headers = response.headers();
    headers.contains_key(ETAG) || headers.contains_key(LAST_MODIFIED)
}

/// Origin date of the response: the `Date` header, or the retrieval time
/// when `Date` is missing or unparseable.
pub fn response_date(response: &HttpResponse) -> OffsetDateTime {
    response
        .headers()
        .get(DATE)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
        .unwrap_or_else(|| response.received_at())
}

/// How long the response stays fresh after its date.
///
/// `max-age` takes precedence. Otherwise the `Expires` header (or the
/// Cache-Control `Expires` fragment) minus the response date. Zero when the
/// response says nothing about freshness.
pub fn freshness_lifetime(response: &HttpResponse) -> Duration {
    let cc = CacheControl::from_headers(response.headers());

    if let Some(max_age) = cc.max_age() {
        return Duration::seconds(i64::try_from(max_age).unwrap_or(i64::MAX));
    }

    let expires = response
        .headers()
        .get(EXPIRES)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_http_date)
        .or_else(|| cc.expires());

    match expires {
        Some(at) => (at - response_date(response)).max(Duration::ZERO),
        None => Duration::ZERO,
    }
}

/// Time elapsed since the response date, never negative.
pub fn current_age(response: &HttpResponse, now: OffsetDateTime) -> Duration {
    (now - response_date(response)).max(Duration::ZERO)
}

/// Whether the freshness lifetime has elapsed.
pub fn is_expired(response: &HttpResponse, now: OffsetDateTime) -> bool {
    current_age(response, now) >= freshness_lifetime(response)
}
