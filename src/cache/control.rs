//! Cache-Control header parsing.
//!
//! Besides the standard directives this accepts an `Expires = <date>`
//! fragment inside `Cache-Control`, as some servers emit it. Because an
//! HTTP-date contains a comma (`Sun, 06 Nov 1994 ...`), a plain split on `,`
//! cuts such a fragment in two; [`split_directives`] glues it back together.

use crate::http::date::parse_http_date;
use http::header::CACHE_CONTROL;
use http::HeaderMap;
use time::OffsetDateTime;

/// A single parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDirective {
    NoCache,
    NoStore,
    MaxAge(u64),
    MustRevalidate,
    Public,
    Private,
    /// `Expires = <date>`; `None` when the date does not parse.
    Expires(Option<OffsetDateTime>),
    /// Anything else, kept verbatim.
    Extension(String),
}

/// Parsed Cache-Control header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheControl {
    directives: Vec<CacheDirective>,
}

impl CacheControl {
    /// Parse a single header value.
    pub fn parse(value: &str) -> Self {
        Self {
            directives: split_directives(value)
                .iter()
                .map(|fragment| parse_directive(fragment))
                .collect(),
        }
    }

    /// Parse every Cache-Control line of a header map as one list.
    ///
    /// Values that are not visible ASCII are skipped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let combined = headers
            .get_all(CACHE_CONTROL)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(", ");
        Self::parse(&combined)
    }

    pub fn directives(&self) -> &[CacheDirective] {
        &self.directives
    }

    pub fn no_cache(&self) -> bool {
        self.directives.contains(&CacheDirective::NoCache)
    }

    pub fn no_store(&self) -> bool {
        self.directives.contains(&CacheDirective::NoStore)
    }

    pub fn must_revalidate(&self) -> bool {
        self.directives.contains(&CacheDirective::MustRevalidate)
    }

    /// First `max-age` value.
    pub fn max_age(&self) -> Option<u64> {
        self.directives.iter().find_map(|d| match d {
            CacheDirective::MaxAge(secs) => Some(*secs),
            _ => None,
        })
    }

    /// Whether an `Expires = <date>` fragment is present at all.
    pub fn has_expires(&self) -> bool {
        self.directives
            .iter()
            .any(|d| matches!(d, CacheDirective::Expires(_)))
    }

    /// Date of the first `Expires` fragment, if it parsed.
    pub fn expires(&self) -> Option<OffsetDateTime> {
        self.directives.iter().find_map(|d| match d {
            CacheDirective::Expires(at) => *at,
            _ => None,
        })
    }
}

/// Split a Cache-Control value into trimmed directive strings.
///
/// An `Expires` fragment whose value was cut after the weekday is rejoined
/// with the fragment that follows it:
///
/// ```
/// use cachenet::cache::control::split_directives;
///
/// assert_eq!(
///     split_directives("no-cache, Expires = Sun, 06 Nov 1994 08:49:37 GMT"),
///     vec!["no-cache", "Expires = Sun, 06 Nov 1994 08:49:37 GMT"],
/// );
/// ```
pub fn split_directives(value: &str) -> Vec<String> {
    let mut fragments = value.split(',').map(str::trim);
    let mut directives = Vec::new();

    while let Some(fragment) = fragments.next() {
        if fragment.is_empty() {
            continue;
        }
        if is_truncated_expires(fragment) {
            if let Some(rest) = fragments.next() {
                directives.push(format!("{}, {}", fragment, rest));
                continue;
            }
        }
        directives.push(fragment.to_string());
    }

    directives
}

/// `Expires = Sun` left over from splitting inside a date.
fn is_truncated_expires(fragment: &str) -> bool {
    match fragment.split_once('=') {
        Some((name, day)) => {
            name.trim().eq_ignore_ascii_case("expires") && is_weekday(day.trim())
        }
        None => false,
    }
}

fn is_weekday(token: &str) -> bool {
    const DAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    DAYS.iter().any(|day| day.eq_ignore_ascii_case(token))
}

fn parse_directive(fragment: &str) -> CacheDirective {
    let (name, value) = match fragment.split_once('=') {
        Some((name, value)) => (name.trim(), Some(value.trim())),
        None => (fragment.trim(), None),
    };

    match (name.to_ascii_lowercase().as_str(), value) {
        ("no-cache", None) => CacheDirective::NoCache,
        ("no-store", None) => CacheDirective::NoStore,
        ("must-revalidate", None) => CacheDirective::MustRevalidate,
        ("public", None) => CacheDirective::Public,
        ("private", _) => CacheDirective::Private,
        ("max-age", Some(secs)) => match secs.trim_matches('"').parse::<u64>() {
            Ok(secs) => CacheDirective::MaxAge(secs),
            Err(_) => CacheDirective::Extension(fragment.to_string()),
        },
        ("expires", Some(date)) => CacheDirective::Expires(parse_http_date(date)),
        _ => CacheDirective::Extension(fragment.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use time::macros::datetime;

    #[test]
    fn test_parse_cache_control() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CACHE_CONTROL,
            HeaderValue::from_static("max-age=3600, no-cache"),
        );

        let cc = CacheControl::from_headers(&headers);
        assert_eq!(cc.max_age(), Some(3600));
        assert!(cc.no_cache());
        assert!(!cc.no_store());
    }

    #[test]
    fn test_split_rejoins_expires_date() {
        let parts = split_directives("no-cache, Expires = Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(parts, ["no-cache", "Expires = Sun, 06 Nov 1994 08:49:37 GMT"]);
    }

    #[test]
    fn test_split_expires_first() {
        let parts = split_directives("Expires = Sun, 06 Nov 1994 08:49:37 GMT, max-age=5");
        assert_eq!(parts, ["Expires = Sun, 06 Nov 1994 08:49:37 GMT", "max-age=5"]);
    }

    #[test]
    fn test_split_leaves_complete_expires_alone() {
        let parts = split_directives("Expires=0, no-store");
        assert_eq!(parts, ["Expires=0", "no-store"]);
    }

    #[test]
    fn test_split_only_rejoins_expires_weekday() {
        assert_eq!(
            split_directives("x-expires-policy=none, no-store"),
            ["x-expires-policy=none", "no-store"]
        );
        assert_eq!(split_directives("Expires=never, public"), ["Expires=never", "public"]);
        assert_eq!(
            split_directives("expires=sun, 06 Nov 1994 08:49:37 GMT"),
            ["expires=sun, 06 Nov 1994 08:49:37 GMT"]
        );
    }

    #[test]
    fn test_split_skips_empty_fragments() {
        assert_eq!(split_directives(" no-store ,, public,"), ["no-store", "public"]);
        assert!(split_directives("").is_empty());
    }

    #[test]
    fn test_expires_fragment_parsed() {
        let cc = CacheControl::parse("no-cache, Expires = Sun, 06 Nov 1994 08:49:37 GMT");
        assert_eq!(
            cc.directives(),
            [
                CacheDirective::NoCache,
                CacheDirective::Expires(Some(datetime!(1994-11-06 08:49:37 UTC))),
            ]
        );
        assert!(cc.has_expires());
    }

    #[test]
    fn test_unparseable_expires_fragment() {
        let cc = CacheControl::parse("Expires = soon");
        assert!(cc.has_expires());
        assert!(cc.expires().is_none());
    }

    #[test]
    fn test_directive_names_case_insensitive() {
        let cc = CacheControl::parse("No-Store, MAX-AGE=10, Must-Revalidate");
        assert!(cc.no_store());
        assert!(cc.must_revalidate());
        assert_eq!(cc.max_age(), Some(10));
    }

    #[test]
    fn test_bad_max_age_is_extension() {
        let cc = CacheControl::parse("max-age=soon");
        assert_eq!(cc.max_age(), None);
        assert_eq!(
            cc.directives(),
            [CacheDirective::Extension("max-age=soon".to_string())]
        );
    }

    #[test]
    fn test_multiple_header_lines_combined() {
        let mut headers = HeaderMap::new();
        headers.append(CACHE_CONTROL, HeaderValue::from_static("public"));
        headers.append(CACHE_CONTROL, HeaderValue::from_static("max-age=60"));

        let cc = CacheControl::from_headers(&headers);
        assert_eq!(
            cc.directives(),
            [CacheDirective::Public, CacheDirective::MaxAge(60)]
        );
    }
}
