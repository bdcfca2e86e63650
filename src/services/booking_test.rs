use super::*;
#[cfg(feature = "live-db-tests")]
use crate::db::live;
#[cfg(feature = "live-db-tests")]
use crate::services::hotel::get_hotel;
#[cfg(feature = "live-db-tests")]
use crate::services::room::{RoomTypeInput, create_room_type};
use crate::services::reservation::MAX_PARTY_SIZE;
use time::macros::datetime;

fn room_type(name: &str, capacity: i32, base_price: f64) -> RoomType {
    RoomType {
        id: Uuid::new_v4(),
        hotel_id: Uuid::nil(),
        name: name.into(),
        description: String::new(),
        capacity,
        base_price,
        image_url: None,
        created_at: OffsetDateTime::UNIX_EPOCH,
    }
}

fn request(check_in: &str, check_out: &str, adults: i32, children: i32) -> StayRequest {
    StayRequest { check_in: check_in.into(), check_out: check_out.into(), adults, children }
}

// =============================================================================
// StayRequest
// =============================================================================

#[test]
fn stay_request_defaults_to_one_adult() {
    let req: StayRequest = serde_json::from_str(r#"{"check_in":"2025-07-01","check_out":"2025-07-03"}"#).unwrap();
    let stay = req.validate().unwrap();
    assert_eq!(stay.adults, 1);
    assert_eq!(stay.children, 0);
    assert_eq!(stay.nights(), 2);
    assert_eq!(stay.check_in, datetime!(2025-07-01 0:00 UTC));
}

#[test]
fn stay_request_rejects_reversed_dates_and_empty_party() {
    let reversed = request("2025-07-03", "2025-07-01", 1, 0).validate().unwrap_err();
    assert!(matches!(reversed, ReservationError::InvalidStay));
    assert!(request("2025-07-01", "2025-07-02", 0, 2).validate().is_err());
}

#[test]
fn stay_request_rejects_oversized_party() {
    let err = request("2025-07-01", "2025-07-02", i32::MAX, 1).validate().unwrap_err();
    assert!(matches!(err, ReservationError::Validation(_)));
    assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(request("2025-07-01", "2025-07-02", MAX_PARTY_SIZE, 1).validate().is_err());
    assert!(request("2025-07-01", "2025-07-02", MAX_PARTY_SIZE - 1, 1).validate().is_ok());
}

#[test]
fn guest_count_never_wraps() {
    let stay = Stay {
        check_in: datetime!(2025-07-01 0:00 UTC),
        check_out: datetime!(2025-07-02 0:00 UTC),
        adults: i32::MAX,
        children: 1,
    };
    assert_eq!(stay.guests(), i32::MAX);
    assert!(!room_type("Suite", 2, 300.0).fits(stay.guests()));
}

#[test]
fn booking_request_flattens_stay() {
    let id = Uuid::new_v4();
    let body = format!(r#"{{"room_type_id":"{id}","check_in":"2025-07-01","check_out":"2025-07-02","adults":2}}"#);
    let req: BookingRequest = serde_json::from_str(&body).unwrap();
    assert_eq!(req.room_type_id, id);
    assert_eq!(req.stay.adults, 2);
}

// =============================================================================
// quote
// =============================================================================

#[test]
fn quote_filters_by_capacity_and_prices_nights() {
    let stay = request("2025-07-01", "2025-07-04", 2, 1).validate().unwrap();
    let quotes = quote(
        vec![room_type("Single", 1, 60.0), room_type("Family", 4, 150.0), room_type("Triple", 3, 110.0)],
        &stay,
    );
    let names: Vec<&str> = quotes.iter().map(|q| q.room_type.name.as_str()).collect();
    assert_eq!(names, vec!["Family", "Triple"]);
    assert_eq!(quotes[0].nights, 3);
    assert!((quotes[0].total_price - 450.0).abs() < f64::EPSILON);
}

#[test]
fn quote_empty_when_nothing_fits() {
    let stay = request("2025-07-01", "2025-07-02", 5, 0).validate().unwrap();
    assert!(quote(vec![room_type("Double", 2, 90.0)], &stay).is_empty());
}

#[test]
fn booking_error_delegates_codes() {
    assert_eq!(BookingError::Disabled.status(), StatusCode::CONFLICT);
    let wrapped = BookingError::from(ReservationError::InvalidStay);
    assert_eq!(wrapped.error_code(), "E_INVALID_STAY");
    assert_eq!(wrapped.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(BookingError::from(RoomError::RoomTypeNotFound(Uuid::nil())).status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn guest_booking_creates_pending_reservation() {
    let pool = live::integration_pool().await;
    let (_, hotel_id) = live::seed_hotel(&pool, "Booking Hotel").await;
    let guest_id = live::seed_profile(&pool, "Guest Person").await;
    let hotel = get_hotel(&pool, hotel_id).await.unwrap();
    let double = create_room_type(
        &pool,
        hotel_id,
        RoomTypeInput { name: "Double".into(), capacity: 2, base_price: 80.0, ..RoomTypeInput::default() },
    )
    .await
    .unwrap();
    let guest = SessionUser {
        id: guest_id,
        full_name: "Guest Person".into(),
        email: format!("{guest_id}@example.com"),
        avatar_url: None,
    };

    let too_many = BookingRequest { room_type_id: double.id, stay: request("2025-08-01", "2025-08-03", 2, 1) };
    assert!(matches!(book(&pool, &hotel, &guest, &too_many).await, Err(BookingError::OverCapacity { .. })));

    let ok = BookingRequest { room_type_id: double.id, stay: request("2025-08-01", "2025-08-03", 2, 0) };
    let reservation = book(&pool, &hotel, &guest, &ok).await.unwrap();
    assert_eq!(reservation.status, ReservationStatus::Pending);
    assert_eq!(reservation.source, SOURCE_BOOKING_ENGINE);
    assert_eq!(reservation.guest_id, Some(guest_id));
    assert!((reservation.total_price - 160.0).abs() < f64::EPSILON);
}
