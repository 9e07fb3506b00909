//! Booking submission handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Local;

use super::dto::{BookingForm, ConfirmationResponse};
use crate::application::{BookingAdmission, BookingRequest};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedForm};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::shared::Money;

#[derive(Clone)]
pub struct BookingState {
    pub admission: Arc<BookingAdmission>,
    pub confirmation_path: Arc<str>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body(content = BookingForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Booking stored, redirect to the confirmation page"),
        (status = 404, description = "Unknown room"),
        (status = 409, description = "Room not available for these dates"),
        (status = 422, description = "Validation error"),
        (status = 500, description = "Booking could not be stored")
    )
)]
pub async fn create_booking(
    State(state): State<BookingState>,
    user: Option<Extension<AuthenticatedUser>>,
    ValidatedForm(form): ValidatedForm<BookingForm>,
) -> Result<Response, ApiError> {
    let quoted_price = match form.price.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Money>()
                .map_err(|e| ApiError::unprocessable(format!("price: {}", e)))?,
        ),
    };

    let request = BookingRequest {
        room_id: form.room_id,
        check_in: form.check_in,
        check_out: form.check_out,
        client_name: form.client_name,
        client_email: form.client_email,
        quoted_price,
        payment_method: form.payment_method,
        user_id: user.map(|Extension(u)| u.user_id),
    };

    state
        .admission
        .create_booking(request, Local::now().date_naive())
        .await?;

    Ok((
        StatusCode::SEE_OTHER,
        [(header::LOCATION, state.confirmation_path.to_string())],
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/reserva-confirmada",
    tag = "Bookings",
    responses(
        (status = 200, description = "Static acknowledgement", body = ApiResponse<ConfirmationResponse>)
    )
)]
pub async fn booking_confirmation() -> Json<ApiResponse<ConfirmationResponse>> {
    Json(ApiResponse::success(ConfirmationResponse {
        message: "Reserva recibida. Le contactaremos para confirmar el pago.".to_string(),
    }))
}
