//! Booking module: guest submission and confirmation page

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
