//! Date helpers shared by reservations, calendar and booking.
//!
//! All stay dates are handled in UTC. Browser date pickers send bare
//! `YYYY-MM-DD` values, which are read as midnight UTC.

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// `#[serde(serialize_with = "serde_iso_date::serialize")]` for `Date` fields
/// rendered as `YYYY-MM-DD`.
pub mod serde_iso_date {
    use serde::Serializer;
    use time::Date;
    use time::macros::format_description;

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid date '{0}': expected YYYY-MM-DD or RFC 3339")]
pub struct DateParseError(pub String);

/// Parse a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns `DateParseError` if the value is not a valid calendar date.
pub fn parse_date(raw: &str) -> Result<Date, DateParseError> {
    let raw = raw.trim();
    Date::parse(raw, format_description!("[year]-[month]-[day]")).map_err(|_| DateParseError(raw.to_owned()))
}

/// Parse a check-in/check-out value: a bare date (midnight UTC) or a full
/// RFC 3339 timestamp (normalized to UTC).
///
/// # Errors
///
/// Returns `DateParseError` if neither format matches.
pub fn parse_stay_instant(raw: &str) -> Result<OffsetDateTime, DateParseError> {
    let raw = raw.trim();
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(ts.to_offset(UtcOffset::UTC));
    }
    parse_date(raw).map(start_of_day)
}

/// Midnight UTC on the given date.
#[must_use]
pub fn start_of_day(date: Date) -> OffsetDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc()
}

/// Calendar day of an instant, in UTC.
#[must_use]
pub fn utc_date(ts: OffsetDateTime) -> Date {
    ts.to_offset(UtcOffset::UTC).date()
}

/// Number of days in the month containing `date`.
#[must_use]
pub fn days_in_month(date: Date) -> u8 {
    date.month().length(date.year())
}

/// First day of the month containing `date`.
#[must_use]
pub fn first_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// Move by whole months, clamping the day to the target month's length
/// (Jan 31 + 1 month = Feb 28/29).
#[must_use]
pub fn add_months(date: Date, months: i32) -> Date {
    let zero_based = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year = zero_based.div_euclid(12);
    let month_number = u8::try_from(zero_based.rem_euclid(12) + 1).unwrap_or(1);
    let Ok(month) = Month::try_from(month_number) else {
        return date;
    };
    let day = date.day().min(month.length(year));
    Date::from_calendar_date(year, month, day).unwrap_or(date)
}

/// Whole nights between two instants, by UTC calendar day.
#[must_use]
pub fn nights_between(check_in: OffsetDateTime, check_out: OffsetDateTime) -> i64 {
    (utc_date(check_out) - utc_date(check_in)).whole_days()
}

#[cfg(test)]
#[path = "dates_test.rs"]
mod tests;
