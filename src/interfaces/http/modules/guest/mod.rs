//! Guest module: own bookings

pub mod handlers;

pub use handlers::*;
