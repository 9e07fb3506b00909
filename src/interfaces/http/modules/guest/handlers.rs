//! Guest dashboard handler

use std::sync::Arc;

use axum::{extract::State, Extension, Json};

use crate::application::GuestService;
use crate::interfaces::http::common::{ApiError, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;
use crate::interfaces::http::modules::bookings::BookingDto;

#[derive(Clone)]
pub struct GuestState {
    pub guest: Arc<GuestService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/me/bookings",
    tag = "Guest",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The signed-in guest's bookings, newest first", body = ApiResponse<Vec<BookingDto>>),
        (status = 401, description = "Sign in required")
    )
)]
pub async fn my_bookings(
    State(state): State<GuestState>,
    user: Option<Extension<AuthenticatedUser>>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let user_id = user.as_ref().map(|Extension(u)| u.user_id.as_str());
    let bookings = state.guest.my_bookings(user_id).await?;
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(BookingDto::from).collect(),
    )))
}
