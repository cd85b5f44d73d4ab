use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{
    BookingListResponse, BookingResponse, CreateBookingRequest, DeleteBookingRequest,
    DeletedResponse, UpdateBookingRequest,
};
use super::services;
use crate::{
    auth::AuthUser,
    error::{invalid_endpoint, AppResult},
    state::AppState,
};

pub fn booking_routes() -> Router<AppState> {
    Router::new().route(
        "/booking",
        get(list_bookings)
            .post(create_booking)
            .patch(update_booking)
            .delete(delete_booking)
            .fallback(invalid_endpoint),
    )
}

#[instrument(skip(state, user))]
pub async fn list_bookings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<BookingListResponse>> {
    let bookings = services::list(state.store.as_ref(), &user).await?;
    Ok(Json(BookingListResponse {
        success: true,
        bookings,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreateBookingRequest>, JsonRejection>,
) -> AppResult<Json<BookingResponse>> {
    let Json(payload) = payload?;
    let booking = services::create(state.store.as_ref(), &user, payload).await?;
    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn update_booking(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<UpdateBookingRequest>, JsonRejection>,
) -> AppResult<Json<BookingResponse>> {
    let Json(payload) = payload?;
    let booking = services::update(state.store.as_ref(), &user, payload).await?;
    Ok(Json(BookingResponse {
        success: true,
        booking,
    }))
}

#[instrument(skip(state, user, payload))]
pub async fn delete_booking(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<DeleteBookingRequest>, JsonRejection>,
) -> AppResult<Json<DeletedResponse>> {
    let Json(payload) = payload?;
    services::delete(state.store.as_ref(), &user, payload).await?;
    Ok(Json(DeletedResponse {
        success: true,
        message: "Booking deleted",
    }))
}
