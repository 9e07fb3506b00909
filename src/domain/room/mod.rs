//! Room aggregate
//!
//! Rooms are reference data edited by admins; the guest flow only reads them.

pub mod model;
pub mod repository;

pub use model::{NewRoom, Room, RoomPatch};
pub use repository::RoomRepository;
