pub mod admin;
pub mod auth;
pub mod bookings;
pub mod guest;
pub mod health;
pub mod metrics;
pub mod request_id;
pub mod rooms;
