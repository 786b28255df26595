//! Display formatting for post dates.

use chrono::{DateTime, NaiveDate};
use tracing::debug;

/// Formats an ISO-8601 date as a long-form British English date, e.g.
/// `2024-01-05` becomes `5 January 2024`. An RFC 3339 timestamp is accepted
/// too, in which case only its date part is shown. Input that is neither is
/// returned unchanged.
pub fn format_date(iso: &str) -> String {
    match parse(iso) {
        Some(date) => date.format("%-d %B %Y").to_string(),
        None => {
            debug!(date = iso, "unrecognized post date");
            iso.to_owned()
        }
    }
}

fn parse(iso: &str) -> Option<NaiveDate> {
    let iso = iso.trim();
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(iso)
            .ok()
            .map(|date_time| date_time.naive_local().date())
    })
}
