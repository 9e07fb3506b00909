//! # Hotel booking service
//!
//! Public room listing with live per-category availability, booking
//! admission, a guest dashboard and a staff/admin panel.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Rooms, bookings, users and their repository traits
//! - **application**: Availability resolver, booking admission, admin and guest use-cases
//! - **infrastructure**: SeaORM persistence, in-memory storage, JWT and password crypto
//! - **interfaces**: REST API with Swagger documentation
//! - **shared**: Errors, money and shutdown plumbing

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig, InMemoryRepositoryProvider};

// Re-export API router
pub use interfaces::http::create_api_router;
