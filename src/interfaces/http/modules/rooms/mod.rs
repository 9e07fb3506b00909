//! Rooms module: public category listing + admin room maintenance

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
