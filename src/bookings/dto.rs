use serde::{Deserialize, Serialize};

use super::repo_types::Booking;

/// POST /booking body. Any client-supplied owner field is ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateBookingRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service: Option<String>,
}

/// PATCH /booking body: `id` plus the fields to change. There is no way to
/// express a change of identifier or owner; such keys are dropped on decode.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBookingRequest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteBookingRequest {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingListResponse {
    pub success: bool,
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub success: bool,
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: &'static str,
}
