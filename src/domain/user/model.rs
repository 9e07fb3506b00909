use chrono::{DateTime, Utc};

/// User role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserRole {
    /// Full access: rooms and bookings
    Admin,
    /// Front desk: booking dashboard, mark paid, delete
    Staff,
    /// Registered guest: own bookings only
    #[default]
    Guest,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Guest => "guest",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            "staff" => Self::Staff,
            _ => Self::Guest,
        }
    }

    pub fn is_admin(&self) -> bool {
        *self == Self::Admin
    }

    /// May see the booking dashboard and mark/delete bookings
    pub fn can_manage_bookings(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }
}

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}
