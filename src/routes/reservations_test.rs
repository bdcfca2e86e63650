use super::*;
use time::macros::date;

fn query(view: Option<&str>, date: Option<&str>) -> CalendarQuery {
    CalendarQuery { view: view.map(str::to_owned), date: date.map(str::to_owned) }
}

const TODAY: Date = date!(2026 - 03 - 18);

#[test]
fn calendar_defaults_to_month_of_today() {
    assert_eq!(calendar_request(&query(None, None), TODAY).unwrap(), (CalendarView::Month, TODAY));
}

#[test]
fn calendar_blank_params_use_defaults() {
    assert_eq!(calendar_request(&query(Some(" "), Some("")), TODAY).unwrap(), (CalendarView::Month, TODAY));
}

#[test]
fn calendar_parses_view_and_date() {
    let (view, anchor) = calendar_request(&query(Some("Week"), Some("2026-01-05")), TODAY).unwrap();
    assert_eq!(view, CalendarView::Week);
    assert_eq!(anchor, date!(2026 - 01 - 05));
}

#[test]
fn calendar_rejects_unknown_view() {
    let err = calendar_request(&query(Some("year"), None), TODAY).unwrap_err();
    assert_eq!(err.status, StatusCode::BAD_REQUEST);
    assert!(err.message.contains("year"));
}

#[test]
fn calendar_rejects_bad_date() {
    let err = calendar_request(&query(Some("day"), Some("18/03/2026")), TODAY).unwrap_err();
    assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
}
