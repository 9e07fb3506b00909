//! Background task that releases stale pending bookings.
//!
//! Disabled unless `booking.pending_expiry_hours` is set. Every
//! `check_interval_secs` it marks bookings still `pendiente` and older
//! than the hold window as `expirado`, which frees their dates.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::Duration;
use tracing::{info, warn};

use crate::domain::{BookingStatus, DomainResult, RepositoryProvider};
use crate::shared::shutdown::ShutdownSignal;

/// Start the pending-hold expiry background task.
pub fn start_pending_expiry_task(
    repos: Arc<dyn RepositoryProvider>,
    shutdown: ShutdownSignal,
    hold_hours: u32,
    check_interval_secs: u64,
) {
    tokio::spawn(async move {
        info!(
            hold_hours,
            check_interval = check_interval_secs,
            "⏳ Pending booking expiry task started"
        );

        let mut interval = tokio::time::interval(Duration::from_secs(check_interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let cutoff = Utc::now() - ChronoDuration::hours(i64::from(hold_hours));
                    if let Err(e) = expire_stale_pending(repos.as_ref(), cutoff).await {
                        warn!(error = %e, "Pending booking expiry check error");
                    }
                }
                _ = shutdown.notified().wait() => {
                    info!("⏳ Pending booking expiry task shutting down");
                    break;
                }
            }
        }

        info!("⏳ Pending booking expiry task stopped");
    });
}

/// Expire pending bookings created before `cutoff`. Returns how many changed.
pub async fn expire_stale_pending(
    repos: &dyn RepositoryProvider,
    cutoff: DateTime<Utc>,
) -> DomainResult<usize> {
    let stale = repos.bookings().find_stale_pending(cutoff).await?;

    if stale.is_empty() {
        return Ok(0);
    }

    info!(count = stale.len(), "Expiring stale pending bookings");

    let mut expired = 0;
    for booking in stale {
        match repos
            .bookings()
            .update_status(booking.id, &[BookingStatus::Pending], BookingStatus::Expired)
            .await
        {
            Ok(0) => info!(
                booking_id = booking.id,
                "Booking left pending before expiry, skipped"
            ),
            Ok(n) => expired += n as usize,
            Err(e) => warn!(booking_id = booking.id, error = %e, "Failed to expire booking"),
        }
    }

    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Booking;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::shared::Money;

    fn booking(id: i32, status: BookingStatus, age_hours: i64) -> Booking {
        Booking {
            id,
            room_id: 7,
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            check_in: "2025-06-01".parse().unwrap(),
            check_out: "2025-06-03".parse().unwrap(),
            total_price: Money::from_major(150),
            payment_method: None,
            status,
            created_at: Utc::now() - ChronoDuration::hours(age_hours),
            user_id: None,
        }
    }

    #[tokio::test]
    async fn only_old_pending_bookings_expire() {
        let repos = InMemoryRepositoryProvider::new();
        repos.put_booking(booking(1, BookingStatus::Pending, 48));
        repos.put_booking(booking(2, BookingStatus::Pending, 1));
        repos.put_booking(booking(3, BookingStatus::Confirmed, 48));

        let cutoff = Utc::now() - ChronoDuration::hours(24);
        assert_eq!(expire_stale_pending(&repos, cutoff).await.unwrap(), 1);

        assert_eq!(status(&repos, 1).await, BookingStatus::Expired);
        assert_eq!(status(&repos, 2).await, BookingStatus::Pending);
        assert_eq!(status(&repos, 3).await, BookingStatus::Confirmed);

        assert_eq!(expire_stale_pending(&repos, cutoff).await.unwrap(), 0);
    }

    async fn status(repos: &InMemoryRepositoryProvider, id: i32) -> BookingStatus {
        repos.bookings().find_by_id(id).await.unwrap().unwrap().status
    }

    #[tokio::test]
    async fn payment_between_read_and_expiry_wins() {
        use crate::application::AdminService;

        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.put_booking(booking(1, BookingStatus::Pending, 48));
        let cutoff = Utc::now() - ChronoDuration::hours(24);

        // The expiry pass has read its stale rows when staff records the payment
        let stale = repos.bookings().find_stale_pending(cutoff).await.unwrap();
        assert_eq!(stale.len(), 1);
        AdminService::new(repos.clone()).mark_paid(1).await.unwrap();

        let changed = repos
            .bookings()
            .update_status(stale[0].id, &[BookingStatus::Pending], BookingStatus::Expired)
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(status(&repos, 1).await, BookingStatus::Confirmed);
        assert_eq!(expire_stale_pending(repos.as_ref(), cutoff).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn rebooked_dates_stay_single_occupancy_after_expiry() {
        use crate::application::{AdminService, BookingAdmission, BookingRequest};
        use crate::domain::{Room, StayRange};

        let repos = Arc::new(InMemoryRepositoryProvider::with_rooms([Room {
            id: 7,
            name: "Doble".into(),
            description: String::new(),
            price_per_night: Money::from_major(75),
            image_url: None,
        }]));
        repos.put_booking(booking(1, BookingStatus::Pending, 48));
        expire_stale_pending(repos.as_ref(), Utc::now() - ChronoDuration::hours(24))
            .await
            .unwrap();

        let admission = BookingAdmission::new(repos.clone(), 30);
        let request = BookingRequest {
            room_id: 7,
            check_in: "2025-06-01".parse().unwrap(),
            check_out: "2025-06-03".parse().unwrap(),
            client_name: "Luis".into(),
            client_email: "luis@example.com".into(),
            quoted_price: None,
            payment_method: None,
            user_id: None,
        };
        let rebooked = admission
            .create_booking(request, "2025-05-01".parse().unwrap())
            .await
            .unwrap();

        let admin = AdminService::new(repos.clone());
        assert!(admin.mark_paid(1).await.is_err());
        admin.mark_paid(rebooked.id).await.unwrap();

        let stay = StayRange::new("2025-06-01".parse().unwrap(), "2025-06-03".parse().unwrap())
            .unwrap();
        let active = repos.bookings().find_overlapping_active(7, stay).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, rebooked.id);
        assert_eq!(active[0].status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn task_expires_on_first_tick() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos.put_booking(booking(1, BookingStatus::Pending, 48));
        let shutdown = ShutdownSignal::new();

        start_pending_expiry_task(repos.clone(), shutdown.clone(), 24, 3600);
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();

        assert_eq!(status(&repos, 1).await, BookingStatus::Expired);
    }
}
