//! Guest dashboard: a signed-in guest's own bookings

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::domain::{Booking, BookingFilter, RepositoryProvider};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GuestError {
    #[error("Sign in to see your bookings")]
    AuthRequired,
}

pub struct GuestService {
    repos: Arc<dyn RepositoryProvider>,
}

impl GuestService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Bookings owned by `current_user`, newest first. A read failure
    /// renders as an empty list.
    pub async fn my_bookings(&self, current_user: Option<&str>) -> Result<Vec<Booking>, GuestError> {
        let user_id = current_user.ok_or(GuestError::AuthRequired)?;

        match self.repos.bookings().list(BookingFilter::for_user(user_id)).await {
            Ok(bookings) => Ok(bookings),
            Err(e) => {
                warn!(user_id, error = %e, "Failed to load guest bookings");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, StayRange};
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::Money;
    use chrono::{Duration, Utc};

    fn booking(id: i32, user_id: &str, age_minutes: i64) -> Booking {
        let stay =
            StayRange::new("2025-06-01".parse().unwrap(), "2025-06-03".parse().unwrap()).unwrap();
        Booking {
            id,
            room_id: 7,
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            check_in: stay.check_in(),
            check_out: stay.check_out(),
            total_price: Money::from_major(150),
            payment_method: None,
            status: BookingStatus::Pending,
            created_at: Utc::now() - Duration::minutes(age_minutes),
            user_id: Some(user_id.into()),
        }
    }

    #[tokio::test]
    async fn anonymous_visitor_needs_to_sign_in() {
        let service = GuestService::new(Arc::new(InMemoryRepositoryProvider::new()));
        assert_eq!(service.my_bookings(None).await, Err(GuestError::AuthRequired));
    }

    #[tokio::test]
    async fn lists_only_own_bookings_newest_first() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.put_booking(booking(1, "u-1", 30));
        repos.put_booking(booking(2, "u-2", 20));
        repos.put_booking(booking(3, "u-1", 10));
        let service = GuestService::new(repos);

        let mine = service.my_bookings(Some("u-1")).await.unwrap();
        assert_eq!(mine.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3, 1]);
    }

    #[tokio::test]
    async fn read_failure_renders_empty() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.put_booking(booking(1, "u-1", 5));
        repos.fail_booking_reads(true);
        let service = GuestService::new(repos);
        assert_eq!(service.my_bookings(Some("u-1")).await, Ok(Vec::new()));
    }
}
