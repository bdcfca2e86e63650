use time::macros::{date, datetime};

use super::*;

#[test]
fn parse_stay_instant_accepts_bare_dates_as_midnight_utc() {
    let ts = parse_stay_instant("2024-06-15").unwrap();
    assert_eq!(ts, datetime!(2024-06-15 00:00 UTC));
}

#[test]
fn parse_stay_instant_normalizes_offsets_to_utc() {
    let ts = parse_stay_instant("2024-06-15T14:30:00+02:00").unwrap();
    assert_eq!(ts, datetime!(2024-06-15 12:30 UTC));
    assert_eq!(ts.offset(), UtcOffset::UTC);
}

#[test]
fn parse_stay_instant_rejects_garbage() {
    assert_eq!(parse_stay_instant("next tuesday"), Err(DateParseError("next tuesday".into())));
    assert!(parse_stay_instant("2024-02-30").is_err());
    assert!(parse_stay_instant("").is_err());
}

#[test]
fn days_in_month_handles_leap_years() {
    assert_eq!(days_in_month(date!(2024 - 02 - 10)), 29);
    assert_eq!(days_in_month(date!(2023 - 02 - 10)), 28);
    assert_eq!(days_in_month(date!(2024 - 12 - 01)), 31);
}

#[test]
fn add_months_clamps_day_and_crosses_years() {
    assert_eq!(add_months(date!(2024 - 01 - 31), 1), date!(2024 - 02 - 29));
    assert_eq!(add_months(date!(2024 - 12 - 15), 1), date!(2025 - 01 - 15));
    assert_eq!(add_months(date!(2024 - 01 - 15), -1), date!(2023 - 12 - 15));
    assert_eq!(add_months(date!(2024 - 03 - 31), -1), date!(2024 - 02 - 29));
}

#[test]
fn nights_between_counts_calendar_days() {
    let check_in = datetime!(2024-06-15 15:00 UTC);
    let check_out = datetime!(2024-06-18 11:00 UTC);
    assert_eq!(nights_between(check_in, check_out), 3);
}

#[test]
fn iso_date_serializes_as_plain_string() {
    #[derive(serde::Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "serde_iso_date::serialize")]
        day: Date,
    }

    let json = serde_json::to_string(&Wrapper { day: date!(2024 - 06 - 05) }).unwrap();
    assert_eq!(json, r#"{"day":"2024-06-05"}"#);
}
