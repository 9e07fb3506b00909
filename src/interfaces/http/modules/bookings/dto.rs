//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Booking;

/// Booking form submitted from the room page
/// (`application/x-www-form-urlencoded`)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookingForm {
    pub room_id: i32,
    /// `YYYY-MM-DD`
    pub check_in: NaiveDate,
    /// `YYYY-MM-DD`, exclusive
    pub check_out: NaiveDate,
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub client_name: String,
    #[validate(email(message = "invalid email format"))]
    pub client_email: String,
    /// Total shown to the guest, e.g. "150.00"
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub payment_method: Option<String>,
}

/// Booking API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub room_id: i32,
    pub client_name: String,
    pub client_email: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Decimal amount, e.g. "150.00"
    pub total_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// "pendiente", "pagado" or "expirado"
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            room_id: b.room_id,
            client_name: b.client_name,
            client_email: b.client_email,
            check_in: b.check_in,
            check_out: b.check_out,
            total_price: b.total_price.to_string(),
            payment_method: b.payment_method,
            status: b.status.as_str().to_string(),
            created_at: b.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfirmationResponse {
    pub message: String,
}
