//! User aggregate
//!
//! Accounts for guests, front-desk staff and admins.

pub mod model;
pub mod repository;

pub use model::{User, UserRole};
pub use repository::UserRepository;
