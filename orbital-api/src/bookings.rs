use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, post},
    Json, Router,
};
use chrono::NaiveDate;
use orbital_core::{Booking, BookingRequest};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct BookingResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub birthday: NaiveDate,
    pub launchpad_id: String,
    pub destination_id: u8,
    pub destination: String,
    pub launch_date: NaiveDate,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            first_name: booking.first_name.into_inner(),
            last_name: booking.last_name.into_inner(),
            gender: booking.gender,
            birthday: booking.birthday,
            launchpad_id: booking.launchpad_id,
            destination_id: booking.destination.id(),
            destination: booking.destination.display_name().to_string(),
            launch_date: booking.launch_date,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/{id}", delete(delete_booking))
}

/// POST /api/v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Json<BookingResponse>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    info!(
        destination = %req.destination,
        launch_date = %req.launch_date,
        "Booking requested"
    );

    let booking = state.resolver.create_booking(req).await?;
    Ok(Json(booking.into()))
}

/// GET /api/v1/bookings
async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.resolver.list_bookings().await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// DELETE /api/v1/bookings/{id}
async fn delete_booking(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id: i64 = raw_id
        .parse()
        .map_err(|_| AppError::ValidationError("Invalid ID".to_string()))?;

    state.resolver.delete_booking(id).await?;

    Ok(Json(json!({ "message": "Booking deleted successfully" })))
}
