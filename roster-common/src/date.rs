//! Calendar day and month parsing
//!
//! All day-bucket comparisons are half-open UTC intervals
//! `[start_of_day, start_of_next_day)` so that session lookups never drift
//! with the host timezone. Session dates are stored as RFC 3339 midnight
//! instants; for a fixed format those compare lexicographically, so the
//! bounds returned here can be bound directly into SQL range queries.

use crate::{Error, Result};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};

/// Parse a strict `YYYY-MM-DD` calendar day (zero-padded, no time part).
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if !is_shaped(s, b"dddd-dd-dd") {
        return Err(Error::InvalidInput(format!("Invalid date: {:?}", s)));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid date: {:?}", s)))
}

/// Parse a strict `YYYY-MM` month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if !is_shaped(s, b"dddd-dd") {
        return Err(Error::InvalidInput(format!("Invalid month: {:?}", s)));
    }
    NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .map_err(|_| Error::InvalidInput(format!("Invalid month: {:?}", s)))
}

/// UTC midnight instant for a calendar day.
pub fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Half-open UTC interval covering one calendar day.
pub fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(day);
    let end = start_of_day(day + Days::new(1));
    (start, end)
}

/// Half-open UTC interval covering one calendar month.
pub fn month_bounds(first_day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(first_day);
    let (next_y, next_m) = if first_day.month() == 12 {
        (first_day.year() + 1, 1)
    } else {
        (first_day.year(), first_day.month() + 1)
    };
    // from_ymd_opt is infallible for day 1 of a real month
    let next = NaiveDate::from_ymd_opt(next_y, next_m, 1).unwrap_or(first_day);
    (start, start_of_day(next))
}

/// `YYYY-MM-DD` key for a stored UTC instant (used by month occupancy maps).
pub fn day_key(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// RFC 3339 encoding used for the sessions.date column.
pub fn stored_date(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse a stored sessions.date value back into a UTC instant.
pub fn parse_stored_date(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Internal(format!("Bad stored date {:?}: {}", s, e)))
}

// Shape check: 'd' matches an ASCII digit, anything else matches itself.
fn is_shaped(s: &str, shape: &[u8]) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape).all(|(b, &p)| match p {
            b'd' => b.is_ascii_digit(),
            _ => b == p,
        })
}
