//! Reservation service: the hotel's bookings, paged list and CRUD.
//!
//! DESIGN
//! ======
//! Stays are stored as UTC instants. Forms send either a bare date (midnight
//! UTC) or a full RFC 3339 timestamp; both normalize through
//! [`crate::dates::parse_stay_instant`]. The only consistency rule enforced
//! here is `check_out > check_in`; overlapping stays in the same room are
//! accepted.

use std::fmt;
use std::str::FromStr;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use uuid::Uuid;

use super::paging::{Page, PageWindow};
use super::room::room_belongs_to_hotel;
use super::validate::{clean_optional, non_blank, normalize_email};
use crate::dates::{DateParseError, parse_stay_instant};

/// Rows per page in the reservations table.
pub const RESERVATIONS_PER_PAGE: usize = 10;

pub const SOURCE_DIRECT: &str = "direct";
pub const SOURCE_BOOKING_ENGINE: &str = "booking_engine";

/// Largest party a single reservation may hold.
pub const MAX_PARTY_SIZE: i32 = 500;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("reservation not found: {0}")]
    NotFound(Uuid),
    #[error("check-out date must be after the check-in date")]
    InvalidStay,
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
    #[error("{0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl crate::error::ErrorCode for ReservationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_RESERVATION_NOT_FOUND",
            Self::InvalidStay => "E_INVALID_STAY",
            Self::InvalidDate(_) => "E_INVALID_DATE",
            Self::Validation(_) => "E_VALIDATION",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidStay | Self::InvalidDate(_) | Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl ReservationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(ReservationError::Validation(format!("unknown reservation status '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationRoomType {
    pub name: String,
    pub capacity: i32,
}

/// The room a reservation is assigned to, as shown in the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationRoom {
    pub room_number: String,
    pub floor: String,
    pub room_type_id: Option<Uuid>,
    pub room_type: Option<ReservationRoomType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    pub source: String,
    pub external_id: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    #[serde(with = "time::serde::rfc3339")]
    pub check_in: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub check_out: OffsetDateTime,
    pub adults: i32,
    pub children: i32,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub special_requests: String,
    pub notes: String,
    pub room: Option<ReservationRoom>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Reservation form payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReservationInput {
    pub room_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub source: Option<String>,
    pub external_id: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: String,
    pub check_out: String,
    pub adults: Option<i32>,
    pub children: Option<i32>,
    pub status: Option<String>,
    pub total_price: Option<f64>,
    pub special_requests: String,
    pub notes: String,
}

/// Validated reservation ready to insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationFields {
    pub room_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub guest_id: Option<Uuid>,
    /// `None` means direct on insert and "keep the stored source" on update.
    pub source: Option<String>,
    pub external_id: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: OffsetDateTime,
    pub check_out: OffsetDateTime,
    pub adults: i32,
    pub children: i32,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub special_requests: String,
    pub notes: String,
}

/// Parse both stay bounds and require `check_out > check_in`.
///
/// # Errors
///
/// Returns `InvalidDate` for unparseable values and `InvalidStay` when the
/// check-out is not strictly after the check-in.
pub fn parse_stay(check_in: &str, check_out: &str) -> Result<(OffsetDateTime, OffsetDateTime), ReservationError> {
    let check_in = parse_stay_instant(check_in)?;
    let check_out = parse_stay_instant(check_out)?;
    if check_out <= check_in {
        return Err(ReservationError::InvalidStay);
    }
    Ok((check_in, check_out))
}

/// Check the party size: at least one adult, no negative children, and at
/// most `MAX_PARTY_SIZE` guests in total.
///
/// # Errors
///
/// Returns `Validation` describing the offending count.
pub fn check_party(adults: i32, children: i32) -> Result<(), ReservationError> {
    if adults < 1 {
        return Err(ReservationError::Validation("at least one adult is required".into()));
    }
    if children < 0 {
        return Err(ReservationError::Validation("children cannot be negative".into()));
    }
    if i64::from(adults) + i64::from(children) > i64::from(MAX_PARTY_SIZE) {
        return Err(ReservationError::Validation(format!(
            "a party cannot exceed {MAX_PARTY_SIZE} guests"
        )));
    }
    Ok(())
}

impl ReservationInput {
    /// Apply defaults and check every field that does not need the database.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure.
    pub fn validate(self) -> Result<ReservationFields, ReservationError> {
        let guest_name =
            non_blank(&self.guest_name).ok_or_else(|| ReservationError::Validation("guest name is required".into()))?;
        let guest_email = normalize_email(&self.guest_email)
            .ok_or_else(|| ReservationError::Validation("a valid guest email is required".into()))?;
        let (check_in, check_out) = parse_stay(&self.check_in, &self.check_out)?;
        let adults = self.adults.unwrap_or(1);
        let children = self.children.unwrap_or(0);
        check_party(adults, children)?;
        let total_price = self.total_price.unwrap_or(0.0);
        if !total_price.is_finite() || total_price < 0.0 {
            return Err(ReservationError::Validation("total price cannot be negative".into()));
        }
        let status = match clean_optional(self.status) {
            Some(raw) => raw.parse()?,
            None => ReservationStatus::Pending,
        };

        Ok(ReservationFields {
            room_id: self.room_id,
            room_type_id: self.room_type_id,
            guest_id: None,
            source: clean_optional(self.source),
            external_id: clean_optional(self.external_id),
            guest_name,
            guest_email,
            guest_phone: self.guest_phone.trim().to_owned(),
            check_in,
            check_out,
            adults,
            children,
            status,
            total_price,
            special_requests: self.special_requests.trim().to_owned(),
            notes: self.notes.trim().to_owned(),
        })
    }
}

// =============================================================================
// QUERIES
// =============================================================================

const RESERVATION_SELECT: &str = "SELECT res.id, res.hotel_id, res.room_id, res.room_type_id, res.guest_id, res.source,
            res.external_id, res.guest_name, res.guest_email, res.guest_phone, res.check_in, res.check_out,
            res.adults, res.children, res.status, res.total_price, res.special_requests, res.notes,
            res.created_at, res.updated_at,
            r.room_number, r.floor, r.room_type_id AS room_room_type_id,
            t.name AS type_name, t.capacity AS type_capacity
     FROM reservations res
     LEFT JOIN rooms r ON r.id = res.room_id
     LEFT JOIN room_types t ON t.id = r.room_type_id";

fn reservation_from_row(row: &PgRow) -> Result<Reservation, ReservationError> {
    let room_number: Option<String> = row.get("room_number");
    let room = room_number.map(|room_number| {
        let type_name: Option<String> = row.get("type_name");
        ReservationRoom {
            room_number,
            floor: row.get::<Option<String>, _>("floor").unwrap_or_default(),
            room_type_id: row.get("room_room_type_id"),
            room_type: type_name.map(|name| ReservationRoomType {
                name,
                capacity: row.get::<Option<i32>, _>("type_capacity").unwrap_or(1),
            }),
        }
    });
    let status: String = row.get("status");

    Ok(Reservation {
        id: row.get("id"),
        hotel_id: row.get("hotel_id"),
        room_id: row.get("room_id"),
        room_type_id: row.get("room_type_id"),
        guest_id: row.get("guest_id"),
        source: row.get("source"),
        external_id: row.get("external_id"),
        guest_name: row.get("guest_name"),
        guest_email: row.get("guest_email"),
        guest_phone: row.get("guest_phone"),
        check_in: row.get("check_in"),
        check_out: row.get("check_out"),
        adults: row.get("adults"),
        children: row.get("children"),
        status: status.parse()?,
        total_price: row.get("total_price"),
        special_requests: row.get("special_requests"),
        notes: row.get("notes"),
        room,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// One page of the hotel's reservations, ordered by check-in ascending.
pub async fn list_reservations(
    pool: &PgPool,
    hotel_id: Uuid,
    page: Option<usize>,
) -> Result<Page<Reservation>, ReservationError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE hotel_id = $1")
        .bind(hotel_id)
        .fetch_one(pool)
        .await?;
    let total = usize::try_from(total).unwrap_or(0);
    let window = PageWindow::resolve(page, RESERVATIONS_PER_PAGE, total);

    let rows = sqlx::query(&format!(
        "{RESERVATION_SELECT} WHERE res.hotel_id = $1 ORDER BY res.check_in, res.created_at LIMIT $2 OFFSET $3"
    ))
    .bind(hotel_id)
    .bind(i64::try_from(window.limit).unwrap_or(i64::MAX))
    .bind(i64::try_from(window.offset).unwrap_or(0))
    .fetch_all(pool)
    .await?;

    let items = rows.iter().map(reservation_from_row).collect::<Result<Vec<_>, _>>()?;
    Ok(window.into_page(items, total))
}

/// Reservations that check in or check out inside `[start, end)`.
pub async fn list_reservations_between(
    pool: &PgPool,
    hotel_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<Vec<Reservation>, ReservationError> {
    let rows = sqlx::query(&format!(
        "{RESERVATION_SELECT}
         WHERE res.hotel_id = $1
           AND ((res.check_in >= $2 AND res.check_in < $3) OR (res.check_out >= $2 AND res.check_out < $3))
         ORDER BY res.check_in"
    ))
    .bind(hotel_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;
    rows.iter().map(reservation_from_row).collect()
}

/// # Errors
///
/// Returns `NotFound` when the reservation is not the hotel's.
pub async fn get_reservation(pool: &PgPool, hotel_id: Uuid, id: Uuid) -> Result<Reservation, ReservationError> {
    let row = sqlx::query(&format!("{RESERVATION_SELECT} WHERE res.hotel_id = $1 AND res.id = $2"))
        .bind(hotel_id)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ReservationError::NotFound(id))?;
    reservation_from_row(&row)
}

async fn ensure_room(pool: &PgPool, hotel_id: Uuid, room_id: Option<Uuid>) -> Result<(), ReservationError> {
    let Some(id) = room_id else {
        return Ok(());
    };
    if room_belongs_to_hotel(pool, hotel_id, id).await? {
        Ok(())
    } else {
        Err(ReservationError::Validation("room does not belong to this hotel".into()))
    }
}

/// Insert validated fields. Shared by the dashboard form and the public
/// booking engine.
pub async fn insert_reservation(
    pool: &PgPool,
    hotel_id: Uuid,
    fields: &ReservationFields,
) -> Result<Reservation, ReservationError> {
    ensure_room(pool, hotel_id, fields.room_id).await?;

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO reservations (hotel_id, room_id, room_type_id, guest_id, source, external_id, guest_name,
             guest_email, guest_phone, check_in, check_out, adults, children, status, total_price,
             special_requests, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
         RETURNING id",
    )
    .bind(hotel_id)
    .bind(fields.room_id)
    .bind(fields.room_type_id)
    .bind(fields.guest_id)
    .bind(fields.source.as_deref().unwrap_or(SOURCE_DIRECT))
    .bind(&fields.external_id)
    .bind(&fields.guest_name)
    .bind(&fields.guest_email)
    .bind(&fields.guest_phone)
    .bind(fields.check_in)
    .bind(fields.check_out)
    .bind(fields.adults)
    .bind(fields.children)
    .bind(fields.status.as_str())
    .bind(fields.total_price)
    .bind(&fields.special_requests)
    .bind(&fields.notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        %hotel_id,
        reservation_id = %id,
        source = fields.source.as_deref().unwrap_or(SOURCE_DIRECT),
        "reservation created"
    );
    get_reservation(pool, hotel_id, id).await
}

/// Create a reservation from the dashboard form.
pub async fn create_reservation(
    pool: &PgPool,
    hotel_id: Uuid,
    input: ReservationInput,
) -> Result<Reservation, ReservationError> {
    let fields = input.validate()?;
    insert_reservation(pool, hotel_id, &fields).await
}

/// Replace a reservation's fields. The guest link is preserved, and so is
/// the source when the form leaves it out.
///
/// # Errors
///
/// Returns `NotFound` if the reservation is not the hotel's.
pub async fn update_reservation(
    pool: &PgPool,
    hotel_id: Uuid,
    id: Uuid,
    input: ReservationInput,
) -> Result<Reservation, ReservationError> {
    let fields = input.validate()?;
    ensure_room(pool, hotel_id, fields.room_id).await?;

    let result = sqlx::query(
        "UPDATE reservations SET room_id = $3, room_type_id = $4, source = COALESCE($5, source), external_id = $6,
             guest_name = $7, guest_email = $8, guest_phone = $9, check_in = $10, check_out = $11,
             adults = $12, children = $13, status = $14, total_price = $15, special_requests = $16,
             notes = $17, updated_at = now()
         WHERE id = $1 AND hotel_id = $2",
    )
    .bind(id)
    .bind(hotel_id)
    .bind(fields.room_id)
    .bind(fields.room_type_id)
    .bind(&fields.source)
    .bind(&fields.external_id)
    .bind(&fields.guest_name)
    .bind(&fields.guest_email)
    .bind(&fields.guest_phone)
    .bind(fields.check_in)
    .bind(fields.check_out)
    .bind(fields.adults)
    .bind(fields.children)
    .bind(fields.status.as_str())
    .bind(fields.total_price)
    .bind(&fields.special_requests)
    .bind(&fields.notes)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ReservationError::NotFound(id));
    }
    get_reservation(pool, hotel_id, id).await
}

/// # Errors
///
/// Returns `NotFound` if the reservation is not the hotel's.
pub async fn delete_reservation(pool: &PgPool, hotel_id: Uuid, id: Uuid) -> Result<(), ReservationError> {
    let result = sqlx::query("DELETE FROM reservations WHERE id = $1 AND hotel_id = $2")
        .bind(id)
        .bind(hotel_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ReservationError::NotFound(id));
    }
    tracing::info!(%hotel_id, reservation_id = %id, "reservation deleted");
    Ok(())
}

#[cfg(test)]
#[path = "reservation_test.rs"]
mod tests;
