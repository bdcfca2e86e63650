use super::*;
#[cfg(feature = "live-db-tests")]
use crate::db::live;
use time::macros::{date, datetime};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn kpis_from_counts() {
    let counts = StatCounts {
        total_rooms: 10,
        available_rooms: 6,
        occupied_rooms: 3,
        total_reservations: 8,
        pending_reservations: 2,
        monthly_revenue: 3000.0,
        yearly_revenue: 12_000.0,
        room_nights_month: 20,
    };
    let stats = HotelStats::from_counts(Uuid::nil(), "Casa".into(), counts, 30);
    assert!(approx(stats.occupancy_rate, 30.0));
    assert!(approx(stats.average_daily_rate, 150.0));
    assert!(approx(stats.revenue_per_available_room, 10.0));
    assert_eq!(stats.available_rooms, 6);
}

#[test]
fn zero_denominators_yield_zero() {
    let counts = StatCounts { monthly_revenue: 500.0, ..StatCounts::default() };
    let stats = HotelStats::from_counts(Uuid::nil(), "Empty".into(), counts, 31);
    assert!(approx(stats.occupancy_rate, 0.0));
    assert!(approx(stats.average_daily_rate, 0.0));
    assert!(approx(stats.revenue_per_available_room, 0.0));
    assert!(approx(stats.monthly_revenue, 500.0));
}

#[test]
fn ratios_round_to_cents() {
    let counts = StatCounts { total_rooms: 3, occupied_rooms: 1, ..StatCounts::default() };
    let stats = HotelStats::from_counts(Uuid::nil(), "Trio".into(), counts, 30);
    assert!(approx(stats.occupancy_rate, 33.33));
}

#[test]
fn periods_cover_month_and_year() {
    let (month_start, month_end, year_start, year_end) = periods(date!(2024 - 12 - 15));
    assert_eq!(month_start, datetime!(2024-12-01 0:00 UTC));
    assert_eq!(month_end, datetime!(2025-01-01 0:00 UTC));
    assert_eq!(year_start, datetime!(2024-01-01 0:00 UTC));
    assert_eq!(year_end, datetime!(2025-01-01 0:00 UTC));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn revenue_ignores_cancelled_stays() {
    let pool = live::integration_pool().await;
    let (_, hotel_id) = live::seed_hotel(&pool, "Stats Hotel").await;
    for (status, price) in [("confirmed", 200.0), ("cancelled", 999.0)] {
        sqlx::query(
            "INSERT INTO reservations (hotel_id, guest_name, guest_email, check_in, check_out, status, total_price)
             VALUES ($1, 'G', 'g@example.com', '2025-06-10T00:00:00Z', '2025-06-12T00:00:00Z', $2, $3)",
        )
        .bind(hotel_id)
        .bind(status)
        .bind(price)
        .execute(&pool)
        .await
        .unwrap();
    }

    let stats = hotel_stats(&pool, hotel_id, "Stats Hotel".into(), date!(2025 - 06 - 20)).await.unwrap();
    assert_eq!(stats.total_reservations, 2);
    assert!(approx(stats.monthly_revenue, 200.0));
    assert!(approx(stats.average_daily_rate, 100.0));
    assert!(approx(stats.yearly_revenue, 200.0));
}
