//! In-memory repository provider
//!
//! DashMap-backed implementation of every repository trait, used by the
//! service tests and by the `--in-memory` development mode.

use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{
    Booking, BookingFilter, BookingRepository, BookingStatus, DomainError, DomainResult,
    NewBooking, NewRoom, RepositoryProvider, Room, RoomPatch, RoomRepository, StayRange, User,
    UserRepository,
};

/// In-memory storage for development and testing
#[derive(Default)]
pub struct InMemoryRepositoryProvider {
    rooms: InMemoryRoomRepository,
    bookings: InMemoryBookingRepository,
    users: InMemoryUserRepository,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed rooms with explicit ids (keeps the id counter ahead of them)
    pub fn with_rooms(rooms: impl IntoIterator<Item = Room>) -> Self {
        let provider = Self::new();
        for room in rooms {
            provider.rooms.put(room);
        }
        provider
    }

    /// Store a booking row as-is (any status, any id)
    pub fn put_booking(&self, booking: Booking) {
        self.bookings.put(booking);
    }

    /// Make every booking read fail, to exercise fail-closed paths
    pub fn fail_booking_reads(&self, fail: bool) {
        self.bookings.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every booking write fail
    pub fn fail_booking_writes(&self, fail: bool) {
        self.bookings.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.rows.len()
    }
}

impl RepositoryProvider for InMemoryRepositoryProvider {
    fn rooms(&self) -> &dyn RoomRepository {
        &self.rooms
    }

    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn users(&self) -> &dyn UserRepository {
        &self.users
    }
}

fn unavailable() -> DomainError {
    DomainError::Database("in-memory store unavailable".to_string())
}

// ── Rooms ──────────────────────────────────────────────────────

pub struct InMemoryRoomRepository {
    rows: DashMap<i32, Room>,
    next_id: AtomicI32,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
        }
    }
}

impl InMemoryRoomRepository {
    fn put(&self, room: Room) {
        self.next_id.fetch_max(room.id + 1, Ordering::SeqCst);
        self.rows.insert(room.id, room);
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn list(&self) -> DomainResult<Vec<Room>> {
        let mut rooms: Vec<Room> = self.rows.iter().map(|r| r.value().clone()).collect();
        rooms.sort_by_key(|r| r.id);
        Ok(rooms)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Room>> {
        Ok(self.rows.get(&id).map(|r| r.value().clone()))
    }

    async fn insert(&self, room: NewRoom) -> DomainResult<Room> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let room = Room {
            id,
            name: room.name,
            description: room.description,
            price_per_night: room.price_per_night,
            image_url: room.image_url,
        };
        self.rows.insert(id, room.clone());
        Ok(room)
    }

    async fn update(&self, id: i32, patch: RoomPatch) -> DomainResult<Option<Room>> {
        Ok(self.rows.get_mut(&id).map(|mut room| {
            patch.apply(&mut room);
            room.clone()
        }))
    }
}

// ── Bookings ───────────────────────────────────────────────────

pub struct InMemoryBookingRepository {
    rows: DashMap<i32, Booking>,
    next_id: AtomicI32,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self {
            rows: DashMap::new(),
            next_id: AtomicI32::new(1),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }
}

impl InMemoryBookingRepository {
    fn put(&self, booking: Booking) {
        self.next_id.fetch_max(booking.id + 1, Ordering::SeqCst);
        self.rows.insert(booking.id, booking);
    }

    fn check_read(&self) -> DomainResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn check_write(&self) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(())
    }

    fn collect(&self, keep: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        let mut rows: Vec<Booking> = self
            .rows
            .iter()
            .filter(|b| keep(b.value()))
            .map(|b| b.value().clone())
            .collect();
        rows.sort_by_key(|b| b.id);
        rows
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert(&self, booking: NewBooking) -> DomainResult<Booking> {
        self.check_write()?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let booking = booking.into_booking(id, Utc::now());
        self.rows.insert(id, booking.clone());
        Ok(booking)
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        self.check_read()?;
        Ok(self.rows.get(&id).map(|b| b.value().clone()))
    }

    async fn list(&self, filter: BookingFilter) -> DomainResult<Vec<Booking>> {
        self.check_read()?;
        let mut rows = self.collect(|b| match &filter.user_id {
            Some(user_id) => b.user_id.as_deref() == Some(user_id.as_str()),
            None => true,
        });
        if filter.newest_first {
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        }
        Ok(rows)
    }

    async fn find_overlapping_active(
        &self,
        room_id: i32,
        stay: StayRange,
    ) -> DomainResult<Vec<Booking>> {
        self.check_read()?;
        Ok(self.collect(|b| b.room_id == room_id && b.blocks(&stay)))
    }

    async fn update_status(
        &self,
        id: i32,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> DomainResult<u64> {
        self.check_write()?;
        // The entry guard holds the shard lock across the check and the write
        Ok(match self.rows.get_mut(&id) {
            Some(mut booking) if from.contains(&booking.status) => {
                booking.status = to;
                1
            }
            _ => 0,
        })
    }

    async fn delete(&self, id: i32) -> DomainResult<u64> {
        self.check_write()?;
        Ok(self.rows.remove(&id).map_or(0, |_| 1))
    }

    async fn find_stale_pending(
        &self,
        created_before: DateTime<Utc>,
    ) -> DomainResult<Vec<Booking>> {
        self.check_read()?;
        Ok(self.collect(|b| b.status == BookingStatus::Pending && b.created_at < created_before))
    }
}

// ── Users ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: DashMap<String, User>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: User) -> DomainResult<()> {
        if self.rows.contains_key(&user.id) {
            return Err(DomainError::Conflict(format!("user {}", user.id)));
        }
        self.rows.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        Ok(self.rows.get(id).map(|u| u.value().clone()))
    }

    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        Ok(self
            .rows
            .iter()
            .find(|u| u.username == login || u.email == login)
            .map(|u| u.value().clone()))
    }

    async fn exists(&self, username: &str, email: &str) -> DomainResult<bool> {
        Ok(self
            .rows
            .iter()
            .any(|u| u.username == username || u.email == email))
    }

    async fn count(&self) -> DomainResult<u64> {
        Ok(self.rows.len() as u64)
    }

    async fn touch_last_login(&self, id: &str) -> DomainResult<()> {
        if let Some(mut user) = self.rows.get_mut(id) {
            user.last_login_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::Money;

    fn stay(a: &str, b: &str) -> StayRange {
        StayRange::new(a.parse().unwrap(), b.parse().unwrap()).unwrap()
    }

    fn new_booking(room_id: i32, user_id: Option<&str>) -> NewBooking {
        NewBooking {
            room_id,
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            stay: stay("2025-06-01", "2025-06-03"),
            total_price: Money::from_major(150),
            payment_method: None,
            user_id: user_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn insert_assigns_ids_and_pending_status() {
        let repos = InMemoryRepositoryProvider::new();
        let a = repos.bookings().insert(new_booking(7, None)).await.unwrap();
        let b = repos.bookings().insert(new_booking(7, None)).await.unwrap();
        assert_eq!(a.id + 1, b.id);
        assert_eq!(a.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let repos = InMemoryRepositoryProvider::new();
        repos.bookings().insert(new_booking(1, Some("u-1"))).await.unwrap();
        repos.bookings().insert(new_booking(2, Some("u-2"))).await.unwrap();
        repos.bookings().insert(new_booking(3, None)).await.unwrap();

        let mine = repos.bookings().list(BookingFilter::for_user("u-1")).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].room_id, 1);
        assert_eq!(repos.bookings().list(BookingFilter::all()).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn overlap_query_is_per_room_and_ignores_expired() {
        let repos = InMemoryRepositoryProvider::new();
        let b = repos.bookings().insert(new_booking(7, None)).await.unwrap();
        let query = stay("2025-06-02", "2025-06-05");

        let hits = repos.bookings().find_overlapping_active(7, query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert!(repos
            .bookings()
            .find_overlapping_active(8, query)
            .await
            .unwrap()
            .is_empty());

        repos
            .bookings()
            .update_status(b.id, &[BookingStatus::Pending], BookingStatus::Expired)
            .await
            .unwrap();
        assert!(repos
            .bookings()
            .find_overlapping_active(7, query)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn seeded_rooms_keep_counter_ahead() {
        let repos = InMemoryRepositoryProvider::with_rooms([Room {
            id: 7,
            name: "Doble".into(),
            description: String::new(),
            price_per_night: Money::from_major(75),
            image_url: None,
        }]);
        let created = repos
            .rooms()
            .insert(NewRoom {
                name: "Suite".into(),
                description: String::new(),
                price_per_night: Money::from_major(200),
                image_url: None,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 8);
    }

    #[tokio::test]
    async fn failure_switches() {
        let repos = InMemoryRepositoryProvider::new();
        repos.fail_booking_writes(true);
        assert!(repos.bookings().insert(new_booking(7, None)).await.is_err());
        repos.fail_booking_reads(true);
        assert!(repos.bookings().list(BookingFilter::all()).await.is_err());
    }
}
