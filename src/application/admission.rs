//! Booking admission
//!
//! Turns a guest's request into a stored `pendiente` booking, or rejects
//! it. Check-then-insert runs under a per-room lock so two requests for
//! the same room cannot both pass the availability check.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::availability::AvailabilityResolver;
use crate::domain::{Booking, NewBooking, RepositoryProvider, StayRange};
use crate::shared::Money;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("Room {room_id} is not available for the requested dates")]
    Unavailable { room_id: i32 },

    #[error("Booking could not be stored: {0}")]
    PersistenceFailure(String),

    #[error("Room {0} does not exist")]
    RoomNotFound(i32),

    #[error("Invalid dates: {0}")]
    InvalidDates(String),
}

impl AdmissionError {
    /// Label for the `bookings_rejected_total` metric
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "unavailable",
            Self::PersistenceFailure(_) => "persistence",
            Self::RoomNotFound(_) => "room_not_found",
            Self::InvalidDates(_) => "invalid_dates",
        }
    }
}

/// A guest's booking submission
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub room_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub client_name: String,
    pub client_email: String,
    /// Price shown to the guest. Informational; the stored total is
    /// always computed from the room rate.
    pub quoted_price: Option<Money>,
    pub payment_method: Option<String>,
    pub user_id: Option<String>,
}

pub struct BookingAdmission {
    repos: Arc<dyn RepositoryProvider>,
    availability: AvailabilityResolver,
    room_locks: DashMap<i32, Arc<Mutex<()>>>,
    max_nights: i64,
}

impl BookingAdmission {
    pub fn new(repos: Arc<dyn RepositoryProvider>, max_nights: u32) -> Self {
        Self {
            availability: AvailabilityResolver::new(repos.clone()),
            repos,
            room_locks: DashMap::new(),
            max_nights: i64::from(max_nights),
        }
    }

    /// Admit `request` as a pending booking. `today` bounds the check-in date.
    pub async fn create_booking(
        &self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, AdmissionError> {
        let result = self.admit(request, today).await;
        match &result {
            Ok(booking) => {
                metrics::counter!("bookings_admitted_total").increment(1);
                info!(
                    booking_id = booking.id,
                    room_id = booking.room_id,
                    check_in = %booking.check_in,
                    check_out = %booking.check_out,
                    total = %booking.total_price,
                    "✅ Booking admitted"
                );
            }
            Err(e) => {
                metrics::counter!("bookings_rejected_total", "reason" => e.reason()).increment(1);
                info!(reason = e.reason(), "Booking rejected: {}", e);
            }
        }
        result
    }

    async fn admit(
        &self,
        request: BookingRequest,
        today: NaiveDate,
    ) -> Result<Booking, AdmissionError> {
        let stay = self.validate_stay(&request, today)?;
        let room_id = request.room_id;

        let room = match self.repos.rooms().find_by_id(room_id).await {
            Ok(Some(room)) => room,
            Ok(None) => return Err(AdmissionError::RoomNotFound(room_id)),
            Err(e) => {
                warn!(room_id, error = %e, "Room lookup failed during admission");
                return Err(AdmissionError::Unavailable { room_id });
            }
        };

        let total_price = room
            .price_per_night
            .times(stay.nights())
            .ok_or_else(|| AdmissionError::InvalidDates("stay cannot be priced".into()))?;

        if let Some(quoted) = request.quoted_price {
            if quoted != total_price {
                warn!(
                    room_id,
                    quoted = %quoted,
                    computed = %total_price,
                    "Quoted price differs from room rate, storing the room rate"
                );
            }
        }

        let lock = self
            .room_locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if !self.availability.is_room_available(room_id, stay).await {
            return Err(AdmissionError::Unavailable { room_id });
        }

        let booking = NewBooking {
            room_id,
            client_name: request.client_name.trim().to_string(),
            client_email: request.client_email.trim().to_string(),
            stay,
            total_price,
            payment_method: request
                .payment_method
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty()),
            user_id: request.user_id,
        };

        self.repos
            .bookings()
            .insert(booking)
            .await
            .map_err(|e| AdmissionError::PersistenceFailure(e.to_string()))
    }

    fn validate_stay(
        &self,
        request: &BookingRequest,
        today: NaiveDate,
    ) -> Result<StayRange, AdmissionError> {
        let stay = StayRange::new(request.check_in, request.check_out)
            .map_err(|_| AdmissionError::InvalidDates("check-out must be after check-in".into()))?;

        if stay.check_in() < today {
            return Err(AdmissionError::InvalidDates(format!(
                "check-in {} is in the past",
                stay.check_in()
            )));
        }
        if stay.nights() > self.max_nights {
            return Err(AdmissionError::InvalidDates(format!(
                "stay of {} nights exceeds the limit of {}",
                stay.nights(),
                self.max_nights
            )));
        }
        Ok(stay)
    }
}
