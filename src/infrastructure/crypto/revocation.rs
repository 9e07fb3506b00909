//! Revoked token registry (logout)

use chrono::Utc;
use dashmap::DashMap;

/// Token ids invalidated by logout, kept until their natural expiry
#[derive(Default)]
pub struct TokenRevocations {
    revoked: DashMap<String, i64>,
}

impl TokenRevocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke `jti` until `expires_at` (Unix timestamp)
    pub fn revoke(&self, jti: &str, expires_at: i64) {
        self.revoked.insert(jti.to_string(), expires_at);
        self.purge_expired();
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.contains_key(jti)
    }

    fn purge_expired(&self) {
        let now = Utc::now().timestamp();
        self.revoked.retain(|_, exp| *exp >= now);
    }

    pub fn len(&self) -> usize {
        self.revoked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revoked.is_empty()
    }
}
