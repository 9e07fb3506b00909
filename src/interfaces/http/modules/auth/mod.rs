//! Authentication module: login, register, current user, logout

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
