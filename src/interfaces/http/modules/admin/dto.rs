//! Admin dashboard DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::{Dashboard, DashboardMetrics};
use crate::interfaces::http::modules::bookings::BookingDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardMetricsDto {
    /// Sum over every listed booking, e.g. "225.00"
    pub total_revenue: String,
    /// Bookings not marked as paid
    pub pending_count: usize,
    pub booking_count: usize,
}

impl From<DashboardMetrics> for DashboardMetricsDto {
    fn from(m: DashboardMetrics) -> Self {
        Self {
            total_revenue: m.total_revenue.to_string(),
            pending_count: m.pending_count,
            booking_count: m.booking_count,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Newest first
    pub bookings: Vec<BookingDto>,
    pub metrics: DashboardMetricsDto,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        Self {
            bookings: d.bookings.into_iter().map(BookingDto::from).collect(),
            metrics: d.metrics.into(),
        }
    }
}
