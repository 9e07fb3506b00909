//! Room listing and admin room maintenance handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;

use super::dto::{CreateRoomRequest, RoomCategoryDto, RoomDto, UpdateRoomRequest};
use crate::application::{AdminService, AvailabilityResolver};
use crate::domain::{NewRoom, RoomPatch};
use crate::interfaces::http::common::{ApiError, ApiResponse, ValidatedJson};
use crate::shared::Money;

#[derive(Clone)]
pub struct RoomState {
    pub availability: Arc<AvailabilityResolver>,
    pub admin: Arc<AdminService>,
}

fn parse_price(raw: &str) -> Result<Money, ApiError> {
    raw.trim()
        .parse::<Money>()
        .map_err(|e| ApiError::unprocessable(format!("price_per_night: {}", e)))
}

#[utoipa::path(
    get,
    path = "/api/v1/rooms/categories",
    tag = "Rooms",
    responses(
        (status = 200, description = "Room categories with today's free rooms", body = ApiResponse<Vec<RoomCategoryDto>>)
    )
)]
pub async fn list_categories(
    State(state): State<RoomState>,
) -> Json<ApiResponse<Vec<RoomCategoryDto>>> {
    let views = state
        .availability
        .list_categories(Local::now().date_naive())
        .await;
    Json(ApiResponse::success(
        views.into_iter().map(RoomCategoryDto::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/rooms",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All rooms", body = ApiResponse<Vec<RoomDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_rooms(
    State(state): State<RoomState>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, ApiError> {
    let rooms = state.admin.list_rooms().await?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/rooms",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room created", body = ApiResponse<RoomDto>),
        (status = 403, description = "Admin only"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_room(
    State(state): State<RoomState>,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    let room = state
        .admin
        .create_room(NewRoom {
            name: request.name.trim().to_string(),
            description: request.description,
            price_per_night: parse_price(&request.price_per_night)?,
            image_url: request.image_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(room.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/admin/rooms/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Room updated", body = ApiResponse<RoomDto>),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_room(
    State(state): State<RoomState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let patch = RoomPatch {
        price_per_night: request.price_per_night.as_deref().map(parse_price).transpose()?,
        description: request.description,
        image_url: request.image_url,
    };
    let room = state.admin.update_room(id, patch).await?;
    Ok(Json(ApiResponse::success(room.into())))
}
