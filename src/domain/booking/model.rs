//! Booking domain entity

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::DomainResult;
use crate::shared::{DomainError, Money};

/// Booking status
///
/// Stored with the hotel's Spanish spellings. The legacy spelling
/// `"approved"` is read as [`BookingStatus::Confirmed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Submitted by a guest, not paid yet
    Pending,
    /// Paid (marked by staff)
    Confirmed,
    /// Pending hold released by the expiry task
    Expired,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendiente",
            Self::Confirmed => "pagado",
            Self::Expired => "expirado",
        }
    }

    pub const ALL: [BookingStatus; 3] = [Self::Pending, Self::Confirmed, Self::Expired];

    /// Every stored spelling that reads as this status, besides unknown
    /// ones (which read as `Pending`)
    pub fn spellings(&self) -> &'static [&'static str] {
        match self {
            Self::Pending => &["pendiente"],
            Self::Confirmed => &["pagado", "approved"],
            Self::Expired => &["expirado"],
        }
    }

    /// Unknown spellings read as `Pending` so the row keeps blocking its dates.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "pendiente" => Self::Pending,
            "pagado" | "approved" => Self::Confirmed,
            "expirado" => Self::Expired,
            _ => Self::Pending,
        }
    }

    /// Whether a booking in this status holds its room for its dates.
    /// Admission and the public occupancy view both use this predicate.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn is_confirmed(&self) -> bool {
        *self == Self::Confirmed
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Half-open stay interval `[check_in, check_out)`. Always at least one night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> DomainResult<Self> {
        if check_in >= check_out {
            return Err(DomainError::Validation(format!(
                "check-out ({}) must be after check-in ({})",
                check_out, check_in
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// `[a,b)` and `[c,d)` overlap iff `a < d && c < b`
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// The guest sleeps in the room on the night of `day`.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.check_in <= day && day < self.check_out
    }
}

/// A stored booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i32,
    pub room_id: i32,
    pub client_name: String,
    pub client_email: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: Money,
    pub payment_method: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    /// Owning account, when the guest was signed in
    pub user_id: Option<String>,
}

impl Booking {
    /// Stored rows may predate date validation, so this is not a `StayRange`.
    pub fn overlaps(&self, stay: &StayRange) -> bool {
        self.check_in < stay.check_out() && stay.check_in() < self.check_out
    }

    /// Whether this booking holds its room on `day`
    pub fn occupies(&self, day: NaiveDate) -> bool {
        self.status.is_active() && self.check_in <= day && day < self.check_out
    }

    /// Whether this booking blocks `stay` for its room
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.status.is_active() && self.overlaps(stay)
    }

    pub fn mark_paid(&mut self) {
        self.status = BookingStatus::Confirmed;
    }

    pub fn expire(&mut self) {
        self.status = BookingStatus::Expired;
    }
}

/// Fields of a booking about to be admitted. There is no status field:
/// repositories always store new bookings as [`BookingStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    pub room_id: i32,
    pub client_name: String,
    pub client_email: String,
    pub stay: StayRange,
    pub total_price: Money,
    pub payment_method: Option<String>,
    pub user_id: Option<String>,
}

impl NewBooking {
    /// Materialize the stored row
    pub fn into_booking(self, id: i32, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            room_id: self.room_id,
            client_name: self.client_name,
            client_email: self.client_email,
            check_in: self.stay.check_in(),
            check_out: self.stay.check_out(),
            total_price: self.total_price,
            payment_method: self.payment_method,
            status: BookingStatus::Pending,
            created_at,
            user_id: self.user_id,
        }
    }
}

/// Listing filter for bookings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only bookings owned by this account
    pub user_id: Option<String>,
    /// Order by `created_at` descending instead of by id
    pub newest_first: bool,
}

impl BookingFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn newest_first() -> Self {
        Self {
            user_id: None,
            newest_first: true,
        }
    }

    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            newest_first: true,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn stay(a: &str, b: &str) -> StayRange {
        StayRange::new(date(a), date(b)).unwrap()
    }

    fn booking(status: BookingStatus, a: &str, b: &str) -> Booking {
        NewBooking {
            room_id: 7,
            client_name: "Ana".into(),
            client_email: "ana@example.com".into(),
            stay: stay(a, b),
            total_price: Money::from_major(150),
            payment_method: None,
            user_id: None,
        }
        .into_booking(1, Utc::now())
        .with_status(status)
    }

    impl Booking {
        fn with_status(mut self, status: BookingStatus) -> Self {
            self.status = status;
            self
        }
    }

    #[test]
    fn stay_requires_check_out_after_check_in() {
        assert!(StayRange::new(date("2025-06-03"), date("2025-06-01")).is_err());
        assert!(StayRange::new(date("2025-06-01"), date("2025-06-01")).is_err());
        assert_eq!(stay("2025-06-01", "2025-06-03").nights(), 2);
    }

    #[test]
    fn overlap_is_half_open() {
        let a = stay("2025-06-01", "2025-06-03");
        assert!(a.overlaps(&stay("2025-06-02", "2025-06-05")));
        assert!(a.overlaps(&stay("2025-05-30", "2025-06-02")));
        assert!(a.overlaps(&stay("2025-05-01", "2025-07-01")));
        assert!(!a.overlaps(&stay("2025-06-03", "2025-06-05")));
        assert!(!a.overlaps(&stay("2025-05-28", "2025-06-01")));
    }

    #[test]
    fn covers_includes_check_in_excludes_check_out() {
        let s = stay("2025-06-01", "2025-06-03");
        assert!(s.covers(date("2025-06-01")));
        assert!(s.covers(date("2025-06-02")));
        assert!(!s.covers(date("2025-06-03")));
    }

    #[test]
    fn new_booking_is_pending() {
        let b = booking(BookingStatus::Pending, "2025-06-01", "2025-06-03");
        assert_eq!(b.status, BookingStatus::Pending);
        assert_eq!(b.check_in, date("2025-06-01"));
        assert_eq!(b.check_out, date("2025-06-03"));
    }

    #[test]
    fn pending_and_confirmed_block_expired_does_not() {
        let query = stay("2025-06-02", "2025-06-04");
        assert!(booking(BookingStatus::Pending, "2025-06-01", "2025-06-03").blocks(&query));
        assert!(booking(BookingStatus::Confirmed, "2025-06-01", "2025-06-03").blocks(&query));
        assert!(!booking(BookingStatus::Expired, "2025-06-01", "2025-06-03").blocks(&query));
    }

    #[test]
    fn occupies_uses_same_status_rule() {
        let day = date("2025-06-02");
        assert!(booking(BookingStatus::Pending, "2025-06-01", "2025-06-03").occupies(day));
        assert!(!booking(BookingStatus::Expired, "2025-06-01", "2025-06-03").occupies(day));
        assert!(!booking(BookingStatus::Confirmed, "2025-06-01", "2025-06-02").occupies(day));
    }

    #[test]
    fn mark_paid_and_expire() {
        let mut b = booking(BookingStatus::Pending, "2025-06-01", "2025-06-03");
        b.mark_paid();
        assert!(b.status.is_confirmed());
        b.mark_paid();
        assert_eq!(b.status, BookingStatus::Confirmed);
        b.expire();
        assert!(!b.status.is_active());
    }

    #[test]
    fn legacy_approved_reads_as_confirmed() {
        assert_eq!(BookingStatus::from_str("approved"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::from_str("pagado"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::from_str("PAGADO"), BookingStatus::Confirmed);
        assert_eq!(BookingStatus::Confirmed.as_str(), "pagado");
    }

    #[test]
    fn unknown_status_defaults_to_pending() {
        assert_eq!(BookingStatus::from_str("cancelado?"), BookingStatus::Pending);
        assert_eq!(BookingStatus::from_str(""), BookingStatus::Pending);
    }
}
