//! Admin use-cases: booking dashboard, payments, room maintenance

use std::sync::Arc;

use tracing::{info, warn};

use super::export::bookings_to_csv;
use crate::domain::{
    Booking, BookingFilter, BookingStatus, DomainError, DomainResult, NewRoom,
    RepositoryProvider, Room, RoomPatch,
};
use crate::shared::Money;

/// Aggregates shown above the booking table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardMetrics {
    /// Sum of `total_price` over every listed booking
    pub total_revenue: Money,
    /// Bookings not yet paid
    pub pending_count: usize,
    pub booking_count: usize,
}

impl DashboardMetrics {
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        Self {
            total_revenue: bookings.iter().map(|b| b.total_price).sum(),
            pending_count: bookings.iter().filter(|b| !b.status.is_confirmed()).count(),
            booking_count: bookings.len(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub bookings: Vec<Booking>,
    pub metrics: DashboardMetrics,
}

pub struct AdminService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AdminService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    // ── Bookings ────────────────────────────────────────────────

    /// Set a pending booking to paid. A missing id changes nothing.
    ///
    /// An expired booking has released its dates, which may already belong
    /// to another guest, so paying it is a conflict.
    pub async fn mark_paid(&self, booking_id: i32) -> DomainResult<()> {
        let changed = self
            .repos
            .bookings()
            .update_status(
                booking_id,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
                BookingStatus::Confirmed,
            )
            .await?;
        if changed > 0 {
            info!(booking_id, "💶 Booking marked as paid");
            return Ok(());
        }

        match self.repos.bookings().find_by_id(booking_id).await? {
            None => {
                info!(booking_id, "Mark paid: booking not found, nothing to do");
                Ok(())
            }
            Some(booking) => {
                warn!(booking_id, status = %booking.status, "Mark paid refused");
                Err(DomainError::Conflict(format!(
                    "Booking {} is {} and its dates are no longer held",
                    booking_id, booking.status
                )))
            }
        }
    }

    /// Remove a booking. A missing id changes nothing.
    pub async fn delete_booking(&self, booking_id: i32) -> DomainResult<()> {
        let removed = self.repos.bookings().delete(booking_id).await?;
        if removed == 0 {
            info!(booking_id, "Delete: booking not found, nothing to do");
        } else {
            info!(booking_id, "🗑️ Booking deleted");
        }
        Ok(())
    }

    /// Every booking, newest first, with totals. A read failure renders
    /// as an empty dashboard.
    pub async fn dashboard(&self) -> Dashboard {
        let bookings = match self.repos.bookings().list(BookingFilter::newest_first()).await {
            Ok(bookings) => bookings,
            Err(e) => {
                warn!(error = %e, "Failed to load booking dashboard");
                Vec::new()
            }
        };
        let metrics = DashboardMetrics::from_bookings(&bookings);
        Dashboard { bookings, metrics }
    }

    /// CSV of the dashboard listing
    pub async fn export_csv(&self) -> DomainResult<String> {
        let bookings = self
            .repos
            .bookings()
            .list(BookingFilter::newest_first())
            .await?;
        let rooms = self.repos.rooms().list().await?;
        info!(rows = bookings.len(), "Exporting bookings as CSV");
        Ok(bookings_to_csv(&bookings, &rooms))
    }

    // ── Rooms ───────────────────────────────────────────────────

    pub async fn list_rooms(&self) -> DomainResult<Vec<Room>> {
        self.repos.rooms().list().await
    }

    pub async fn create_room(&self, room: NewRoom) -> DomainResult<Room> {
        if room.name.trim().is_empty() {
            return Err(DomainError::Validation("Room name is required".into()));
        }
        if room.price_per_night.is_negative() {
            return Err(DomainError::Validation("Price cannot be negative".into()));
        }
        let room = self.repos.rooms().insert(room).await?;
        info!(room_id = room.id, name = %room.name, "🛏️ Room created");
        Ok(room)
    }

    /// Overwrite the given fields of a room
    pub async fn update_room(&self, room_id: i32, patch: RoomPatch) -> DomainResult<Room> {
        if patch.price_per_night.is_some_and(|p| p.is_negative()) {
            return Err(DomainError::Validation("Price cannot be negative".into()));
        }
        let room = self
            .repos
            .rooms()
            .update(room_id, patch)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "Room",
                field: "id",
                value: room_id.to_string(),
            })?;
        info!(room_id, price = %room.price_per_night, "Room updated");
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewBooking, StayRange};
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn room(id: i32) -> Room {
        Room {
            id,
            name: "Doble".into(),
            description: "Dos camas".into(),
            price_per_night: Money::from_major(75),
            image_url: Some("/img/doble.jpg".into()),
        }
    }

    async fn seeded() -> (Arc<InMemoryRepositoryProvider>, AdminService, i32) {
        let repos = Arc::new(InMemoryRepositoryProvider::with_rooms([room(7)]));
        let booking = repos
            .bookings()
            .insert(NewBooking {
                room_id: 7,
                client_name: "Ana".into(),
                client_email: "ana@example.com".into(),
                stay: StayRange::new("2025-06-01".parse().unwrap(), "2025-06-03".parse().unwrap())
                    .unwrap(),
                total_price: Money::from_major(150),
                payment_method: None,
                user_id: None,
            })
            .await
            .unwrap();
        let service = AdminService::new(repos.clone());
        (repos, service, booking.id)
    }

    #[tokio::test]
    async fn mark_paid_is_idempotent() {
        let (repos, service, id) = seeded().await;
        service.mark_paid(id).await.unwrap();
        let once = repos.bookings().find_by_id(id).await.unwrap().unwrap();
        service.mark_paid(id).await.unwrap();
        let twice = repos.bookings().find_by_id(id).await.unwrap().unwrap();

        assert_eq!(once.status, BookingStatus::Confirmed);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn mark_paid_on_missing_id_is_noop() {
        let (repos, service, _) = seeded().await;
        service.mark_paid(999).await.unwrap();
        assert_eq!(repos.booking_count(), 1);
    }

    #[tokio::test]
    async fn expired_booking_cannot_be_paid_after_rebooking() {
        use crate::application::{BookingAdmission, BookingRequest};

        let (repos, service, id) = seeded().await;
        repos
            .bookings()
            .update_status(id, &[BookingStatus::Pending], BookingStatus::Expired)
            .await
            .unwrap();

        // The released dates go to another guest
        let admission = BookingAdmission::new(repos.clone(), 30);
        let rebooked = admission
            .create_booking(
                BookingRequest {
                    room_id: 7,
                    client_name: "Luis".into(),
                    client_email: "luis@example.com".into(),
                    check_in: "2025-06-01".parse().unwrap(),
                    check_out: "2025-06-03".parse().unwrap(),
                    quoted_price: None,
                    payment_method: None,
                    user_id: None,
                },
                "2025-05-01".parse().unwrap(),
            )
            .await
            .unwrap();

        assert!(matches!(
            service.mark_paid(id).await,
            Err(DomainError::Conflict(_))
        ));

        let stay = StayRange::new("2025-06-01".parse().unwrap(), "2025-06-03".parse().unwrap())
            .unwrap();
        let active = repos.bookings().find_overlapping_active(7, stay).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, rebooked.id);
    }

    #[tokio::test]
    async fn delete_twice_is_noop() {
        let (repos, service, id) = seeded().await;
        service.delete_booking(id).await.unwrap();
        service.delete_booking(id).await.unwrap();
        assert_eq!(repos.booking_count(), 0);
    }

    #[tokio::test]
    async fn dashboard_metrics() {
        let (repos, service, id) = seeded().await;
        repos
            .bookings()
            .insert(NewBooking {
                room_id: 7,
                client_name: "Luis".into(),
                client_email: "luis@example.com".into(),
                stay: StayRange::new("2025-06-05".parse().unwrap(), "2025-06-06".parse().unwrap())
                    .unwrap(),
                total_price: Money::from_major(75),
                payment_method: None,
                user_id: None,
            })
            .await
            .unwrap();
        service.mark_paid(id).await.unwrap();

        let dashboard = service.dashboard().await;
        assert_eq!(dashboard.metrics.total_revenue, Money::from_major(225));
        assert_eq!(dashboard.metrics.pending_count, 1);
        assert_eq!(dashboard.metrics.booking_count, 2);
    }

    #[tokio::test]
    async fn dashboard_renders_empty_on_read_failure() {
        let (repos, service, _) = seeded().await;
        repos.fail_booking_reads(true);
        let dashboard = service.dashboard().await;
        assert!(dashboard.bookings.is_empty());
        assert_eq!(dashboard.metrics.total_revenue, Money::ZERO);
        assert!(service.export_csv().await.is_err());
    }

    #[tokio::test]
    async fn update_room_overwrites_given_fields() {
        let (_, service, _) = seeded().await;
        let updated = service
            .update_room(
                7,
                RoomPatch {
                    price_per_night: Some(Money::from_major(90)),
                    description: None,
                    image_url: Some("/img/new.jpg".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_per_night, Money::from_major(90));
        assert_eq!(updated.description, "Dos camas");
        assert_eq!(updated.image_url.as_deref(), Some("/img/new.jpg"));
    }

    #[tokio::test]
    async fn update_missing_room_is_not_found() {
        let (_, service, _) = seeded().await;
        let err = service.update_room(42, RoomPatch::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Room", .. }));
    }

    #[tokio::test]
    async fn export_uses_room_names() {
        let (_, service, _) = seeded().await;
        let csv = service.export_csv().await.unwrap();
        assert!(csv.lines().nth(1).unwrap().contains(",Doble,"));
    }
}
