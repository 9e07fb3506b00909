//! Booking aggregate
//!
//! Contains the Booking entity, its status lifecycle, the half-open stay
//! interval and the repository interface.

pub mod model;
pub mod repository;

pub use model::{Booking, BookingFilter, BookingStatus, NewBooking, StayRange};
pub use repository::BookingRepository;
