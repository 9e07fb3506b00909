//! Room DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::RoomCategoryView;
use crate::domain::Room;

/// One category on the public listing
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomCategoryDto {
    pub name: String,
    pub description: String,
    /// Decimal amount, e.g. "75.00"
    pub price_per_night: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub available_count: u32,
    /// Room to book from this category, absent when all are taken
    pub first_available_id: Option<i32>,
}

impl From<RoomCategoryView> for RoomCategoryDto {
    fn from(v: RoomCategoryView) -> Self {
        Self {
            name: v.name,
            description: v.description,
            price_per_night: v.price_per_night.to_string(),
            image_url: v.image_url,
            available_count: v.available_count,
            first_available_id: v.first_available_id,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_per_night: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            name: r.name,
            description: r.description,
            price_per_night: r.price_per_night.to_string(),
            image_url: r.image_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 80, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    /// Decimal amount, e.g. "75.00"
    #[validate(length(min = 1, message = "price is required"))]
    pub price_per_night: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Fields left out are kept as they are
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    pub price_per_night: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    pub image_url: Option<String>,
}
