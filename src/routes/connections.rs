//! OTA channel connection routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::auth::HotelOwner;
use crate::services::ota::{self, ConnectionInput, ConnectionView};
use crate::state::AppState;

/// `GET /api/connections`: the full provider catalog with stored state.
pub async fn list_connections(
    State(state): State<AppState>,
    owner: HotelOwner,
) -> Result<Json<Vec<ConnectionView>>, ApiError> {
    Ok(Json(ota::list_connections(&state.pool, owner.hotel_id).await?))
}

/// `POST /api/connections`: store credentials for one provider.
pub async fn configure(
    State(state): State<AppState>,
    owner: HotelOwner,
    Json(body): Json<ConnectionInput>,
) -> Result<(StatusCode, Json<ConnectionView>), ApiError> {
    let view = ota::configure(&state.pool, owner.hotel_id, body).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `POST /api/connections/:id/toggle`
pub async fn toggle(
    State(state): State<AppState>,
    owner: HotelOwner,
    Path(connection_id): Path<Uuid>,
) -> Result<Json<ConnectionView>, ApiError> {
    Ok(Json(ota::toggle(&state.pool, owner.hotel_id, connection_id).await?))
}
