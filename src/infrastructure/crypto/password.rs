//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Lowest cost bcrypt accepts; keeps hashing fast in tests
pub const MIN_COST: u32 = 4;

/// Hash with an explicit bcrypt cost (tests use [`MIN_COST`])
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_matches_only_the_original() {
        let hashed = hash_password_with_cost("secreto123", MIN_COST).unwrap();
        assert!(verify_password("secreto123", &hashed).unwrap());
        assert!(!verify_password("otro", &hashed).unwrap());
    }
}
