//! Room repository interface

use async_trait::async_trait;

use super::model::{NewRoom, Room, RoomPatch};
use crate::domain::DomainResult;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// All rooms, ordered by id
    async fn list(&self) -> DomainResult<Vec<Room>>;

    /// Find room by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>>;

    /// Create a room and return it with its assigned id
    async fn insert(&self, room: NewRoom) -> DomainResult<Room>;

    /// Apply a patch. Returns `None` when the room does not exist.
    async fn update(&self, id: i32, patch: RoomPatch) -> DomainResult<Option<Room>>;
}
