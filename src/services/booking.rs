//! Public booking engine: availability quotes and guest bookings.
//!
//! DESIGN
//! ======
//! Availability is a capacity filter over the hotel's room types: any type
//! that fits the party is offered, priced at nights × base price. Existing
//! reservations are not consulted, so two guests can book the same type for
//! the same nights; the operator resolves that when confirming.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::hotel::Hotel;
use super::reservation::{
    Reservation, ReservationError, ReservationFields, ReservationStatus, SOURCE_BOOKING_ENGINE, check_party,
    insert_reservation, parse_stay,
};
use super::room::{RoomError, RoomType, get_room_type, list_room_types};
use super::session::SessionUser;
use crate::dates::nights_between;
use crate::error::ErrorCode;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("online booking is disabled for this hotel")]
    Disabled,
    #[error("{room_type} cannot host {guests} guests")]
    OverCapacity { room_type: String, guests: i32 },
    #[error(transparent)]
    Reservation(#[from] ReservationError),
    #[error(transparent)]
    Room(#[from] RoomError),
}

impl ErrorCode for BookingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled => "E_BOOKING_DISABLED",
            Self::OverCapacity { .. } => "E_OVER_CAPACITY",
            Self::Reservation(inner) => inner.error_code(),
            Self::Room(inner) => inner.error_code(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Disabled => StatusCode::CONFLICT,
            Self::OverCapacity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Reservation(inner) => inner.status(),
            Self::Room(inner) => inner.status(),
        }
    }
}

fn default_adults() -> i32 {
    1
}

/// Dates and party size from the booking widget.
#[derive(Debug, Clone, Deserialize)]
pub struct StayRequest {
    pub check_in: String,
    pub check_out: String,
    #[serde(default = "default_adults")]
    pub adults: i32,
    #[serde(default)]
    pub children: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub room_type_id: Uuid,
    #[serde(flatten)]
    pub stay: StayRequest,
}

/// A validated stay window and party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stay {
    pub check_in: OffsetDateTime,
    pub check_out: OffsetDateTime,
    pub adults: i32,
    pub children: i32,
}

impl Stay {
    #[must_use]
    pub fn guests(&self) -> i32 {
        self.adults.saturating_add(self.children)
    }

    #[must_use]
    pub fn nights(&self) -> i64 {
        nights_between(self.check_in, self.check_out).max(1)
    }
}

impl StayRequest {
    /// # Errors
    ///
    /// Returns the reservation validation error for bad dates or party size.
    pub fn validate(&self) -> Result<Stay, ReservationError> {
        let (check_in, check_out) = parse_stay(&self.check_in, &self.check_out)?;
        check_party(self.adults, self.children)?;
        Ok(Stay { check_in, check_out, adults: self.adults, children: self.children })
    }
}

/// A room type offered for a stay, with its price.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub room_type: RoomType,
    pub nights: i64,
    pub total_price: f64,
}

#[allow(clippy::cast_precision_loss)]
fn price(room_type: &RoomType, nights: i64) -> f64 {
    room_type.base_price * nights as f64
}

/// Room types that fit the party, priced for the stay, in input order.
#[must_use]
pub fn quote(room_types: Vec<RoomType>, stay: &Stay) -> Vec<Quote> {
    let nights = stay.nights();
    room_types
        .into_iter()
        .filter(|t| t.fits(stay.guests()))
        .map(|room_type| Quote { total_price: price(&room_type, nights), nights, room_type })
        .collect()
}

// =============================================================================
// OPERATIONS
// =============================================================================

fn ensure_enabled(hotel: &Hotel) -> Result<(), BookingError> {
    if hotel.booking_enabled { Ok(()) } else { Err(BookingError::Disabled) }
}

/// Quote every room type of a public hotel that fits the request.
///
/// # Errors
///
/// Returns `Disabled` when the hotel has booking switched off.
pub async fn check_availability(pool: &PgPool, hotel: &Hotel, request: &StayRequest) -> Result<Vec<Quote>, BookingError> {
    ensure_enabled(hotel)?;
    let stay = request.validate()?;
    let room_types = list_room_types(pool, hotel.id).await?;
    Ok(quote(room_types, &stay))
}

/// Book a room type for the signed-in guest. The reservation starts pending.
///
/// # Errors
///
/// Returns `Disabled`, a validation error, `RoomTypeNotFound` for a type of
/// another hotel, or `OverCapacity` when the party does not fit.
pub async fn book(
    pool: &PgPool,
    hotel: &Hotel,
    guest: &SessionUser,
    request: &BookingRequest,
) -> Result<Reservation, BookingError> {
    ensure_enabled(hotel)?;
    let stay = request.stay.validate()?;
    let room_type = get_room_type(pool, hotel.id, request.room_type_id).await?;
    if !room_type.fits(stay.guests()) {
        return Err(BookingError::OverCapacity { room_type: room_type.name, guests: stay.guests() });
    }

    let fields = ReservationFields {
        room_id: None,
        room_type_id: Some(room_type.id),
        guest_id: Some(guest.id),
        source: Some(SOURCE_BOOKING_ENGINE.to_owned()),
        external_id: None,
        guest_name: guest.full_name.clone(),
        guest_email: guest.email.clone(),
        guest_phone: String::new(),
        check_in: stay.check_in,
        check_out: stay.check_out,
        adults: stay.adults,
        children: stay.children,
        status: ReservationStatus::Pending,
        total_price: price(&room_type, stay.nights()),
        special_requests: String::new(),
        notes: String::new(),
    };
    let reservation = insert_reservation(pool, hotel.id, &fields).await?;
    tracing::info!(hotel_id = %hotel.id, guest_id = %guest.id, reservation_id = %reservation.id, "guest booking created");
    Ok(reservation)
}

#[cfg(test)]
#[path = "booking_test.rs"]
mod tests;
