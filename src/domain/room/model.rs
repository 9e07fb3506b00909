//! Room domain entity

use crate::shared::Money;

/// A physical room. Several rooms share one `name`, which acts as the
/// category label shown to guests ("Doble", "Individual", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: i32,
    /// Category label, not unique
    pub name: String,
    pub description: String,
    pub price_per_night: Money,
    /// Reference to the room picture (URL or storage key)
    pub image_url: Option<String>,
}

/// Fields for a room created by an admin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRoom {
    pub name: String,
    pub description: String,
    pub price_per_night: Money,
    pub image_url: Option<String>,
}

/// Partial overwrite of the editable room fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomPatch {
    pub price_per_night: Option<Money>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.price_per_night.is_none() && self.description.is_none() && self.image_url.is_none()
    }

    pub fn apply(&self, room: &mut Room) {
        if let Some(price) = self.price_per_night {
            room.price_per_night = price;
        }
        if let Some(description) = &self.description {
            room.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            room.image_url = Some(image_url.clone());
        }
    }
}
