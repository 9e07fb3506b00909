//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{Booking, BookingFilter, BookingStatus, NewBooking, StayRange};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking with status `Pending` and a generated id / `created_at`
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking>;

    /// Find booking by ID
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// List bookings (optionally one user's, optionally newest first)
    async fn list(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>>;

    /// Active (pending or confirmed) bookings of `room_id` overlapping `stay`
    async fn find_overlapping_active(
        &self,
        room_id: i32,
        stay: StayRange,
    ) -> DomainResult<Vec<Booking>>;

    /// Set the status to `to`, but only while the current status is one of
    /// `from`. Returns the number of rows changed: 0 for a missing id or a
    /// booking that has already moved elsewhere.
    async fn update_status(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> DomainResult<u64>;

    /// Delete a booking. Returns the number of rows removed (0 for a missing id).
    async fn delete(&self, id: i32) -> DomainResult<u64>;

    /// Pending bookings created before `created_before`
    async fn find_stale_pending(&self, created_before: DateTime<Utc>)
        -> DomainResult<Vec<Booking>>;
}
