//! Tests for cache key derivation.

use cachenet::cache::{CacheKey, CacheMode, CacheStore, MemoryStore};
use cachenet::http::ConnectionMode;
use cachenet::HttpRequestInfo;
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

fn get(url: &str) -> HttpRequestInfo {
    HttpRequestInfo::parse(Method::GET, url).unwrap()
}

fn key(request: &HttpRequestInfo) -> CacheKey {
    CacheKey::derive(request).unwrap()
}

#[test]
fn test_options_do_not_change_key() {
    let base = get("http://example.com/r?a=1");
    let store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());
    let other_store: Arc<dyn CacheStore> = Arc::new(MemoryStore::new());

    let variants = [
        base.clone().with_timeout(Duration::from_secs(1)),
        base.clone().with_timeout(Duration::from_secs(90)),
        base.clone().with_cache_store(Some(store)),
        base.clone().with_cache_store(Some(other_store)),
        base.clone().with_connection(ConnectionMode::Close),
        base.clone().with_cache_mode(CacheMode::ForceRefresh),
    ];

    for variant in &variants {
        assert_eq!(key(variant), key(&base));
    }
}

#[test]
fn test_query_parameters_discriminate() {
    let a = key(&get("http://example.com/search?q=rust"));
    let b = key(&get("http://example.com/search?q=go"));
    let c = key(&get("http://example.com/search"));
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
}

#[test]
fn test_request_parameters_discriminate() {
    let a = key(&get("http://example.com/search").with_parameter("page", "1"));
    let b = key(&get("http://example.com/search").with_parameter("page", "2"));
    assert_ne!(a, b);
}

#[test]
fn test_query_is_a_set() {
    assert_eq!(
        key(&get("http://example.com/s?a=1&b=2")),
        key(&get("http://example.com/s?b=2&a=1"))
    );
    assert_eq!(
        key(&get("http://example.com/s?a=1")),
        key(&get("http://example.com/s").with_parameter("a", "1"))
    );
}

#[test]
fn test_origin_discriminates() {
    let base = key(&get("http://example.com/r"));
    assert_ne!(base, key(&get("https://example.com/r")));
    assert_ne!(base, key(&get("http://example.org/r")));
    assert_ne!(base, key(&get("http://example.com:8080/r")));
    assert_ne!(base, key(&get("http://example.com/other")));
}

#[test]
fn test_credentials_discriminate() {
    let anonymous = key(&get("http://example.com/r"));
    let alice = key(&get("http://example.com/r").with_credentials("alice", "pw"));
    let alice_other = key(&get("http://example.com/r").with_credentials("alice", "other"));
    let bob = key(&get("http://example.com/r").with_credentials("bob", "pw"));

    assert_ne!(anonymous, alice);
    assert_ne!(alice, alice_other);
    assert_ne!(alice, bob);
}

#[test]
fn test_tls_verify_discriminates() {
    assert_ne!(
        key(&get("https://example.com/r")),
        key(&get("https://example.com/r").with_tls_verify(false))
    );
}

#[test]
fn test_headers_do_not_discriminate() {
    let plain = key(&get("http://example.com/r"));
    let with_header = key(
        &get("http://example.com/r")
            .try_with_header("Accept", "text/html")
            .unwrap(),
    );
    assert_eq!(plain, with_header);
}

#[test]
fn test_only_get_is_keyed() {
    assert!(CacheKey::derive(&get("http://example.com/r")).is_some());
    for method in [Method::POST, Method::HEAD, Method::OPTIONS] {
        assert!(CacheKey::derive(&get("http://example.com/r").with_method(method)).is_none());
    }
}

#[test]
fn test_usable_as_map_key() {
    let mut map = HashMap::new();
    map.insert(key(&get("http://example.com/a")), 1);
    map.insert(key(&get("http://example.com/b")), 2);
    map.insert(key(&get("http://EXAMPLE.com:80/a")), 3);

    assert_eq!(map.len(), 2);
    assert_eq!(map[&key(&get("http://example.com/a"))], 3);
}

#[test]
fn test_storage_key_stable_across_equal_keys() {
    let a = key(&get("http://example.com/s?b=2&a=1"));
    let b = key(&get("http://example.com/s?a=1").with_parameter("b", "2"));
    assert_eq!(a.storage_key(), b.storage_key());
    assert_eq!(a.storage_key(), "GET http://example.com:80/s?a=1&b=2");
}
