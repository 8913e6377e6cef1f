//! Cache key derivation.
//!
//! Two requests share a cache entry iff they agree on the resource (scheme,
//! host, effective port, path, query parameters as a set), the credentials
//! and the TLS verification mode. Transport options such as the timeout,
//! connection mode or the cache store itself never take part.

use crate::http::request::HttpRequestInfo;
use http::Method;
use std::fmt;
use url::form_urlencoded;

/// Identity of a cacheable request.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    /// scheme://host:port
    origin: String,
    path: String,
    /// Query pairs from the URL and the request, sorted and deduplicated
    parameters: Vec<(String, String)>,
    username: Option<String>,
    password: Option<String>,
    tls_verify: bool,
}

impl CacheKey {
    /// Derive the key for a request.
    ///
    /// Returns `None` when the request can never be cached: anything but
    /// GET, or a URL without a host.
    pub fn derive(request: &HttpRequestInfo) -> Option<Self> {
        if request.method() != Method::GET {
            return None;
        }

        let url = request.url();
        let host = url.host_str()?.to_ascii_lowercase();
        let origin = match url.port_or_known_default() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        };

        let mut parameters: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .chain(request.parameters().iter().cloned())
            .collect();
        parameters.sort();
        parameters.dedup();

        let credentials = request.credentials();

        Some(Self {
            method: Method::GET,
            origin,
            path: url.path().to_string(),
            parameters,
            username: credentials.map(|c| c.username().to_string()),
            password: credentials.map(|c| c.password().to_string()),
            tls_verify: request.tls_verify(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Canonical string form for stores that index by string.
    ///
    /// Contains the password verbatim; never log it.
    pub fn storage_key(&self) -> String {
        self.render(self.password.as_deref())
    }

    fn render(&self, password: Option<&str>) -> String {
        let mut out = format!("{} {}{}", self.method, self.origin, self.path);

        if !self.parameters.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.parameters.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }

        if let Some(username) = &self.username {
            let username: String = form_urlencoded::byte_serialize(username.as_bytes()).collect();
            let password: String = password
                .map(|p| form_urlencoded::byte_serialize(p.as_bytes()).collect())
                .unwrap_or_default();
            out.push_str(&format!(" auth={}:{}", username, password));
        }

        if !self.tls_verify {
            out.push_str(" verify=off");
        }

        out
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.password.as_ref().map(|_| "***");
        f.write_str(&self.render(redacted))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.to_string()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(url: &str) -> HttpRequestInfo {
        HttpRequestInfo::parse(Method::GET, url).unwrap()
    }

    #[test]
    fn test_non_get_has_no_key() {
        for method in [Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::HEAD] {
            let req = get("http://example.com/").with_method(method);
            assert!(CacheKey::derive(&req).is_none());
        }
    }

    #[test]
    fn test_fragment_ignored() {
        assert_eq!(
            CacheKey::derive(&get("http://example.com/a#top")),
            CacheKey::derive(&get("http://example.com/a"))
        );
    }

    #[test]
    fn test_default_port_normalized() {
        assert_eq!(
            CacheKey::derive(&get("http://EXAMPLE.com:80/a")),
            CacheKey::derive(&get("http://example.com/a"))
        );
        assert_ne!(
            CacheKey::derive(&get("http://example.com:8080/a")),
            CacheKey::derive(&get("http://example.com/a"))
        );
    }

    #[test]
    fn test_parameter_order_irrelevant() {
        let a = get("http://example.com/s?b=2&a=1");
        let b = get("http://example.com/s")
            .with_parameter("a", "1")
            .with_parameter("b", "2");
        assert_eq!(CacheKey::derive(&a), CacheKey::derive(&b));
    }

    #[test]
    fn test_storage_key_format() {
        let key = CacheKey::derive(
            &get("http://example.com/s?q=a b")
                .with_credentials("bob", "s3cret")
                .with_tls_verify(false),
        )
        .unwrap();
        assert_eq!(
            key.storage_key(),
            "GET http://example.com:80/s?q=a+b auth=bob:s3cret verify=off"
        );
    }

    #[test]
    fn test_display_redacts_password() {
        let key =
            CacheKey::derive(&get("http://example.com/").with_credentials("bob", "s3cret")).unwrap();
        let shown = key.to_string();
        assert!(shown.contains("bob"));
        assert!(!shown.contains("s3cret"));
        assert!(!format!("{:?}", key).contains("s3cret"));
    }
}
