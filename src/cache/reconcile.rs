//! Header reconciliation after `304 Not Modified`.
//!
//! Chromium mapping: net/http/http_response_headers.cc (Update)
//!
//! The headers of the 304 replace the same-named headers of the stored
//! response. Status and body are never touched.

use crate::http::response::HttpResponse;
use http::header::{
    CONNECTION, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE, TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use http::{HeaderMap, HeaderName};

/// Which headers of a 304 are copied into the stored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Every header on the 304 replaces the stored one.
    #[default]
    FullMerge,
    /// Hop-by-hop headers, and any header the 304 names in `Connection`,
    /// are left as stored.
    EndToEndOnly,
}

/// Copy the headers of `not_modified` onto `cached`.
///
/// Each header name present on the 304 has all its stored values replaced by
/// the 304's values. Names absent from the 304 are kept.
pub fn reconcile(cached: &mut HttpResponse, not_modified: &HttpResponse, policy: ReconcilePolicy) {
    let incoming = not_modified.headers();
    let connection_tokens = match policy {
        ReconcilePolicy::FullMerge => Vec::new(),
        ReconcilePolicy::EndToEndOnly => connection_tokens(incoming),
    };

    let headers = cached.headers_mut();
    for name in incoming.keys() {
        if policy == ReconcilePolicy::EndToEndOnly
            && (is_hop_by_hop(name) || connection_tokens.contains(name))
        {
            continue;
        }

        headers.remove(name);
        for value in incoming.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
}

/// RFC 2616 §13.5.1 hop-by-hop headers.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    *name == CONNECTION
        || *name == PROXY_AUTHENTICATE
        || *name == PROXY_AUTHORIZATION
        || *name == TE
        || *name == TRAILER
        || *name == TRANSFER_ENCODING
        || *name == UPGRADE
        || name.as_str() == "keep-alive"
}

/// Header names listed in `Connection`, which are hop-by-hop for this message.
fn connection_tokens(headers: &HeaderMap) -> Vec<HeaderName> {
    headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|token| HeaderName::from_bytes(token.trim().as_bytes()).ok())
        .collect()
}
