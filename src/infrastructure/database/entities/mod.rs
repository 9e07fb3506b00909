//! Database entities module

pub mod booking;
pub mod room;
pub mod user;

pub use booking::Entity as Booking;
pub use room::Entity as Room;
pub use user::Entity as User;
