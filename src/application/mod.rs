//! Application layer: use-cases over the domain repositories

pub mod admin;
pub mod admission;
pub mod availability;
pub mod expiry;
pub mod export;
pub mod guest;
pub mod identity;

pub use admin::{AdminService, Dashboard, DashboardMetrics};
pub use admission::{AdmissionError, BookingAdmission, BookingRequest};
pub use availability::{
    compute_today_occupancy, group_by_category, AvailabilityResolver, RoomCategoryView,
};
pub use expiry::{expire_stale_pending, start_pending_expiry_task};
pub use guest::{GuestError, GuestService};
pub use identity::{AuthResult, DefaultAdmin, UserService};
