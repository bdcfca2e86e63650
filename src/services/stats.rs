//! Dashboard KPIs for a hotel.
//!
//! Counts and revenue sums come from one aggregate query; the ratios are
//! derived in [`HotelStats::from_counts`] so the arithmetic is testable
//! without a database. Revenue counts every non-cancelled reservation by its
//! check-in date in the current UTC month or year.

use serde::Serialize;
use sqlx::{PgPool, Row};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::{add_months, days_in_month, first_of_month, start_of_day};

/// Raw aggregates read from the database.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatCounts {
    pub total_rooms: i64,
    pub available_rooms: i64,
    pub occupied_rooms: i64,
    pub total_reservations: i64,
    pub pending_reservations: i64,
    pub monthly_revenue: f64,
    pub yearly_revenue: f64,
    pub room_nights_month: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotelStats {
    pub hotel_id: Uuid,
    pub hotel_name: String,
    pub total_rooms: i64,
    pub available_rooms: i64,
    pub total_reservations: i64,
    pub pending_reservations: i64,
    pub monthly_revenue: f64,
    pub yearly_revenue: f64,
    pub occupancy_rate: f64,
    pub average_daily_rate: f64,
    pub revenue_per_available_room: f64,
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: f64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    round2(numerator / denominator as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl HotelStats {
    /// Derive the KPI ratios. Any zero denominator yields 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(hotel_id: Uuid, hotel_name: String, counts: StatCounts, days_in_month: u8) -> Self {
        Self {
            hotel_id,
            hotel_name,
            total_rooms: counts.total_rooms,
            available_rooms: counts.available_rooms,
            total_reservations: counts.total_reservations,
            pending_reservations: counts.pending_reservations,
            monthly_revenue: round2(counts.monthly_revenue),
            yearly_revenue: round2(counts.yearly_revenue),
            occupancy_rate: ratio(counts.occupied_rooms as f64 * 100.0, counts.total_rooms),
            average_daily_rate: ratio(counts.monthly_revenue, counts.room_nights_month),
            revenue_per_available_room: ratio(
                counts.monthly_revenue,
                counts.total_rooms * i64::from(days_in_month),
            ),
        }
    }
}

/// Start of the month and year containing `today`, plus the month's end.
fn periods(today: Date) -> (OffsetDateTime, OffsetDateTime, OffsetDateTime, OffsetDateTime) {
    let month_start = first_of_month(today);
    let month_end = add_months(month_start, 1);
    let year_start = month_start.replace_month(time::Month::January).unwrap_or(month_start);
    let year_end = add_months(year_start, 12);
    (
        start_of_day(month_start),
        start_of_day(month_end),
        start_of_day(year_start),
        start_of_day(year_end),
    )
}

/// Compute the dashboard KPIs for `hotel_id` as of `today` (UTC).
///
/// # Errors
///
/// Returns a database error if the aggregate query fails.
pub async fn hotel_stats(pool: &PgPool, hotel_id: Uuid, hotel_name: String, today: Date) -> Result<HotelStats, sqlx::Error> {
    let (month_start, month_end, year_start, year_end) = periods(today);

    let row = sqlx::query(
        r"SELECT
            (SELECT COUNT(*) FROM rooms WHERE hotel_id = $1) AS total_rooms,
            (SELECT COUNT(*) FROM rooms WHERE hotel_id = $1 AND status = 'available') AS available_rooms,
            (SELECT COUNT(*) FROM rooms WHERE hotel_id = $1 AND status = 'occupied') AS occupied_rooms,
            (SELECT COUNT(*) FROM reservations WHERE hotel_id = $1) AS total_reservations,
            (SELECT COUNT(*) FROM reservations WHERE hotel_id = $1 AND status = 'pending') AS pending_reservations,
            (SELECT COALESCE(SUM(total_price), 0)::float8 FROM reservations
              WHERE hotel_id = $1 AND status <> 'cancelled' AND check_in >= $2 AND check_in < $3) AS monthly_revenue,
            (SELECT COALESCE(SUM(total_price), 0)::float8 FROM reservations
              WHERE hotel_id = $1 AND status <> 'cancelled' AND check_in >= $4 AND check_in < $5) AS yearly_revenue,
            (SELECT COALESCE(SUM((check_out AT TIME ZONE 'UTC')::date - (check_in AT TIME ZONE 'UTC')::date), 0)::int8
               FROM reservations
              WHERE hotel_id = $1 AND status <> 'cancelled' AND check_in >= $2 AND check_in < $3) AS room_nights_month",
    )
    .bind(hotel_id)
    .bind(month_start)
    .bind(month_end)
    .bind(year_start)
    .bind(year_end)
    .fetch_one(pool)
    .await?;

    let counts = StatCounts {
        total_rooms: row.get("total_rooms"),
        available_rooms: row.get("available_rooms"),
        occupied_rooms: row.get("occupied_rooms"),
        total_reservations: row.get("total_reservations"),
        pending_reservations: row.get("pending_reservations"),
        monthly_revenue: row.get("monthly_revenue"),
        yearly_revenue: row.get("yearly_revenue"),
        room_nights_month: row.get("room_nights_month"),
    };
    Ok(HotelStats::from_counts(hotel_id, hotel_name, counts, days_in_month(today)))
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod tests;
