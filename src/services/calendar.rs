//! Reservation calendar: day, week and month grouping.
//!
//! DESIGN
//! ======
//! Pure functions over an already-fetched list. Days are compared by UTC
//! calendar date equality only; a stay spanning several days appears on its
//! check-in day (and, in the day view, on its check-out day). No availability
//! or overlap checks happen here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

use super::reservation::Reservation;
use crate::dates::{add_months, days_in_month, first_of_month, serde_iso_date, utc_date};

/// Reservations shown per month cell before the rest collapse into `overflow`.
pub const MONTH_CELL_LIMIT: usize = 3;

/// Anything with a stay window can be placed on the calendar.
pub trait Stay {
    fn check_in(&self) -> OffsetDateTime;
    fn check_out(&self) -> OffsetDateTime;
}

impl Stay for Reservation {
    fn check_in(&self) -> OffsetDateTime {
        self.check_in
    }

    fn check_out(&self) -> OffsetDateTime {
        self.check_out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarView {
    Day,
    Week,
    #[default]
    Month,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown calendar view '{0}': expected day, week or month")]
pub struct UnknownView(pub String);

impl FromStr for CalendarView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            other => Err(UnknownView(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HourSlot<T> {
    pub hour: u8,
    pub reservations: Vec<T>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay<T> {
    #[serde(serialize_with = "serde_iso_date::serialize")]
    pub date: Date,
    pub is_today: bool,
    pub reservations: Vec<T>,
    pub overflow: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum CalendarBody<T> {
    Day { slots: Vec<HourSlot<T>> },
    Week { days: Vec<CalendarDay<T>> },
    Month { leading_blanks: u8, days: Vec<CalendarDay<T>> },
}

#[derive(Debug, Clone, Serialize)]
pub struct Calendar<T> {
    #[serde(serialize_with = "serde_iso_date::serialize")]
    pub date: Date,
    #[serde(serialize_with = "serde_iso_date::serialize")]
    pub previous: Date,
    #[serde(serialize_with = "serde_iso_date::serialize")]
    pub next: Date,
    #[serde(flatten)]
    pub body: CalendarBody<T>,
}

/// Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: Date) -> Date {
    date - Duration::days(i64::from(date.weekday().number_days_from_monday()))
}

/// Half-open `[start, end)` day range covered by a view.
#[must_use]
pub fn view_range(view: CalendarView, date: Date) -> (Date, Date) {
    match view {
        CalendarView::Day => (date, date + Duration::days(1)),
        CalendarView::Week => {
            let start = week_start(date);
            (start, start + Duration::days(7))
        }
        CalendarView::Month => {
            let start = first_of_month(date);
            (start, start + Duration::days(i64::from(days_in_month(date))))
        }
    }
}

/// Anchor date one view-step away. Month steps clamp the day to the target
/// month's length.
#[must_use]
pub fn navigate(view: CalendarView, date: Date, steps: i32) -> Date {
    match view {
        CalendarView::Day => date + Duration::days(i64::from(steps)),
        CalendarView::Week => date + Duration::weeks(i64::from(steps)),
        CalendarView::Month => add_months(date, steps),
    }
}

/// Stays whose check-in falls on `day`, in list order.
fn checking_in_on<T: Stay + Clone>(stays: &[T], day: Date) -> Vec<T> {
    stays.iter().filter(|s| utc_date(s.check_in()) == day).cloned().collect()
}

fn day_slots<T: Stay + Clone>(stays: &[T], date: Date) -> Vec<HourSlot<T>> {
    let mut slots: Vec<HourSlot<T>> = (0..24).map(|hour| HourSlot { hour, reservations: Vec::new() }).collect();
    for stay in stays {
        if utc_date(stay.check_in()) != date && utc_date(stay.check_out()) != date {
            continue;
        }
        let hour = stay.check_in().to_offset(time::UtcOffset::UTC).hour();
        slots[usize::from(hour)].reservations.push(stay.clone());
    }
    slots
}

fn days_between<T: Stay + Clone>(stays: &[T], start: Date, end: Date, today: Date, limit: Option<usize>) -> Vec<CalendarDay<T>> {
    let mut days = Vec::new();
    let mut day = start;
    while day < end {
        let mut reservations = checking_in_on(stays, day);
        let overflow = match limit {
            Some(limit) if reservations.len() > limit => {
                let hidden = reservations.len() - limit;
                reservations.truncate(limit);
                hidden
            }
            _ => 0,
        };
        days.push(CalendarDay { date: day, is_today: day == today, reservations, overflow });
        day += Duration::days(1);
    }
    days
}

/// Group `stays` into the requested view around `date`.
#[must_use]
pub fn build<T: Stay + Clone>(view: CalendarView, date: Date, today: Date, stays: &[T]) -> Calendar<T> {
    let (start, end) = view_range(view, date);
    let body = match view {
        CalendarView::Day => CalendarBody::Day { slots: day_slots(stays, date) },
        CalendarView::Week => CalendarBody::Week { days: days_between(stays, start, end, today, None) },
        CalendarView::Month => CalendarBody::Month {
            leading_blanks: start.weekday().number_days_from_monday(),
            days: days_between(stays, start, end, today, Some(MONTH_CELL_LIMIT)),
        },
    };
    Calendar { date, previous: navigate(view, date, -1), next: navigate(view, date, 1), body }
}

#[cfg(test)]
#[path = "calendar_test.rs"]
mod tests;
