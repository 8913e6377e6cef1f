//! HTTP-date parsing and formatting (RFC 2616 §3.3.1).
//!
//! Accepts the preferred IMF-fixdate form and the legacy asctime form.
//! Dates are always produced in IMF-fixdate.

use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parse an HTTP-date into a UTC timestamp.
///
/// Returns `None` for anything that is not a recognised date; callers treat
/// an unparseable date the same as a missing one.
pub fn parse_http_date(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();

    // Sun, 06 Nov 1994 08:49:37 GMT
    let imf_fixdate = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    if let Ok(dt) = PrimitiveDateTime::parse(value, imf_fixdate) {
        return Some(dt.assume_utc());
    }

    // Sun Nov  6 08:49:37 1994
    let asctime = format_description!(
        "[weekday repr:short] [month repr:short] [day padding:space] [hour]:[minute]:[second] [year]"
    );
    PrimitiveDateTime::parse(value, asctime)
        .ok()
        .map(PrimitiveDateTime::assume_utc)
}

/// Format a timestamp as an IMF-fixdate.
pub fn format_http_date(at: OffsetDateTime) -> String {
    let imf_fixdate = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
    );
    at.to_offset(UtcOffset::UTC)
        .format(imf_fixdate)
        .unwrap_or_default()
}
