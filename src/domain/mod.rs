//! Domain layer: entities, value types and repository interfaces

pub mod booking;
pub mod repositories;
pub mod room;
pub mod user;

pub use booking::{Booking, BookingFilter, BookingRepository, BookingStatus, NewBooking, StayRange};
pub use repositories::{DomainResult, RepositoryProvider};
pub use room::{NewRoom, Room, RoomPatch, RoomRepository};
pub use user::{User, UserRepository, UserRole};

pub use crate::shared::errors::DomainError;
