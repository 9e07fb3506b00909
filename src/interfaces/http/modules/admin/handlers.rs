//! Booking dashboard handlers (staff and admins)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};

use super::dto::DashboardResponse;
use crate::application::AdminService;
use crate::interfaces::http::common::{ApiError, ApiResponse, EmptyData};

#[derive(Clone)]
pub struct AdminState {
    pub admin: Arc<AdminService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings with totals", body = ApiResponse<DashboardResponse>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn get_dashboard(State(state): State<AdminState>) -> Json<ApiResponse<DashboardResponse>> {
    let dashboard = state.admin.dashboard().await;
    Json(ApiResponse::success(dashboard.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings/export.csv",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Bookings as CSV", content_type = "text/csv"),
        (status = 500, description = "Bookings could not be loaded")
    )
)]
pub async fn export_csv(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let csv = state.admin.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"reservas.csv\"",
            ),
        ],
        csv,
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/bookings/{id}/mark-paid",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking is paid (also for unknown ids)", body = ApiResponse<EmptyData>),
        (status = 409, description = "Booking has expired and no longer holds its dates")
    )
)]
pub async fn mark_paid(
    State(state): State<AdminState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.admin.mark_paid(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    delete,
    path = "/api/v1/admin/bookings/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking removed (also for unknown ids)", body = ApiResponse<EmptyData>)
    )
)]
pub async fn delete_booking(
    State(state): State<AdminState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.admin.delete_booking(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
