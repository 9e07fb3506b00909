//! Credentials: JWT tokens, password hashing, logout revocation

pub mod jwt;
pub mod password;
pub mod revocation;

pub use jwt::{create_token, verify_token, JwtConfig, TokenClaims};
pub use password::{hash_password, verify_password};
pub use revocation::TokenRevocations;
