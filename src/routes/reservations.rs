//! Reservation routes, including the calendar views.

use std::str::FromStr;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::{parse_date, start_of_day};
use crate::error::ApiError;
use crate::routes::auth::HotelOwner;
use crate::services::calendar::{self, Calendar, CalendarView};
use crate::services::paging::Page;
use crate::services::reservation::{self, Reservation, ReservationError, ReservationInput};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub view: Option<String>,
    pub date: Option<String>,
}

/// Resolve the requested view and anchor date; both default (month, today).
fn calendar_request(query: &CalendarQuery, today: Date) -> Result<(CalendarView, Date), ApiError> {
    let view = match query.view.as_deref().filter(|v| !v.trim().is_empty()) {
        Some(raw) => CalendarView::from_str(raw).map_err(|e| ApiError::bad_request(e.to_string()))?,
        None => CalendarView::default(),
    };
    let date = match query.date.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(raw) => parse_date(raw).map_err(ReservationError::from)?,
        None => today,
    };
    Ok((view, date))
}

/// `GET /api/reservations?page=N`
pub async fn list_reservations(
    State(state): State<AppState>,
    owner: HotelOwner,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Reservation>>, ApiError> {
    Ok(Json(reservation::list_reservations(&state.pool, owner.hotel_id, query.page).await?))
}

/// `GET /api/reservations/:id`
pub async fn get_reservation(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(reservation::get_reservation(&state.pool, owner.hotel_id, id).await?))
}

/// `POST /api/reservations`
pub async fn create_reservation(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<ReservationInput>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let created = reservation::create_reservation(&state.pool, owner.hotel_id, body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /api/reservations/:id`
pub async fn update_reservation(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(id): Path<Uuid>,
    Json(body): Json<ReservationInput>,
) -> Result<Json<Reservation>, ApiError> {
    Ok(Json(reservation::update_reservation(&state.pool, owner.hotel_id, id, body).await?))
}

/// `DELETE /api/reservations/:id`
pub async fn delete_reservation(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    reservation::delete_reservation(&state.pool, owner.hotel_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/reservations/calendar?view=day|week|month&date=YYYY-MM-DD`
pub async fn calendar(
    State(state): State<AppState>,
    owner: HotelOwner,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<Calendar<Reservation>>, ApiError> {
    let today = OffsetDateTime::now_utc().date();
    let (view, date) = calendar_request(&query, today)?;
    let (start, end) = calendar::view_range(view, date);

    let reservations =
        reservation::list_reservations_between(&state.pool, owner.hotel_id, start_of_day(start), start_of_day(end))
            .await?;
    Ok(Json(calendar::build(view, date, today, &reservations)))
}

#[cfg(test)]
#[path = "reservations_test.rs"]
mod tests;
