//! Availability resolver
//!
//! Decides whether a room is free for a stay and builds the public
//! category listing ("Doble: 3 free") from rooms and bookings.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{Booking, BookingFilter, RepositoryProvider, Room, StayRange};
use crate::shared::Money;

/// One category (room name) on the public listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomCategoryView {
    pub name: String,
    pub description: String,
    pub price_per_night: Money,
    pub image_url: Option<String>,
    /// Rooms of this category not occupied today
    pub available_count: u32,
    /// Lowest-listed free room, the one a guest books from the listing
    pub first_available_id: Option<i32>,
}

impl RoomCategoryView {
    fn seeded_from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            description: room.description.clone(),
            price_per_night: room.price_per_night,
            image_url: room.image_url.clone(),
            available_count: 0,
            first_available_id: None,
        }
    }
}

/// Ids of rooms held by an active booking on `today`
pub fn compute_today_occupancy(bookings: &[Booking], today: NaiveDate) -> HashSet<i32> {
    bookings
        .iter()
        .filter(|b| b.occupies(today))
        .map(|b| b.room_id)
        .collect()
}

/// Group rooms by name in first-seen order, counting free rooms per group.
///
/// Each view carries the attributes of the first room seen with that name.
pub fn group_by_category(rooms: &[Room], occupied: &HashSet<i32>) -> Vec<RoomCategoryView> {
    let mut views: Vec<RoomCategoryView> = Vec::new();

    for room in rooms {
        let index = match views.iter().position(|v| v.name == room.name) {
            Some(i) => i,
            None => {
                views.push(RoomCategoryView::seeded_from(room));
                views.len() - 1
            }
        };

        if !occupied.contains(&room.id) {
            let view = &mut views[index];
            view.available_count += 1;
            if view.first_available_id.is_none() {
                view.first_available_id = Some(room.id);
            }
        }
    }

    views
}

/// Read side of booking admission and of the public listing
#[derive(Clone)]
pub struct AvailabilityResolver {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityResolver {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// True only when no active booking of `room_id` overlaps `stay`.
    ///
    /// A storage failure answers `false`.
    pub async fn is_room_available(&self, room_id: i32, stay: StayRange) -> bool {
        match self.repos.bookings().find_overlapping_active(room_id, stay).await {
            Ok(conflicts) => conflicts.is_empty(),
            Err(e) => {
                warn!(room_id, error = %e, "Availability check failed, treating room as taken");
                false
            }
        }
    }

    /// Category listing for `today`. A read failure renders an empty list.
    pub async fn list_categories(&self, today: NaiveDate) -> Vec<RoomCategoryView> {
        let rooms = match self.repos.rooms().list().await {
            Ok(rooms) => rooms,
            Err(e) => {
                warn!(error = %e, "Failed to load rooms for category listing");
                return Vec::new();
            }
        };
        let bookings = match self.repos.bookings().list(BookingFilter::all()).await {
            Ok(bookings) => bookings,
            Err(e) => {
                warn!(error = %e, "Failed to load bookings for category listing");
                return Vec::new();
            }
        };

        let occupied = compute_today_occupancy(&bookings, today);
        group_by_category(&rooms, &occupied)
    }
}
