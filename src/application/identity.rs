//! Identity: registration, login, logout and the startup admin account
//!
//! HTTP handlers are thin wrappers that delegate to `UserService`.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{DomainError, DomainResult, RepositoryProvider, User, UserRole};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig, TokenClaims};
use crate::infrastructure::crypto::password::{hash_password_with_cost, verify_password};
use crate::infrastructure::crypto::TokenRevocations;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Credentials for the account created on first start
#[derive(Debug, Clone)]
pub struct DefaultAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    revocations: Arc<TokenRevocations>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        revocations: Arc<TokenRevocations>,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            revocations,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate user by username/email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        let Some(user) = self.repos.users().find_by_login(username_or_email).await? else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        if !user.is_active {
            return Err(DomainError::Unauthorized("Account is disabled".into()));
        }

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let (token, _) = create_token(&user.id, &user.username, user.role, &self.jwt_config)
            .map_err(|e| DomainError::Validation(format!("Failed to create token: {}", e)))?;

        if let Err(e) = self.repos.users().touch_last_login(&user.id).await {
            warn!(user_id = %user.id, error = %e, "Failed to record last login");
        }

        info!(user_id = %user.id, username = %user.username, "🔑 User logged in");
        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    /// Invalidate the presented token until it would have expired anyway.
    pub fn logout(&self, claims: &TokenClaims) {
        self.revocations.revoke(&claims.jti, claims.exp);
        info!(user_id = %claims.sub, "User logged out");
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a guest account.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> DomainResult<User> {
        if username.len() < 3 || username.len() > 50 {
            return Err(DomainError::Validation(
                "Username must be 3-50 characters".into(),
            ));
        }
        if password.len() < 8 {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".into(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation("Invalid email address".into()));
        }

        let user = self.create_user(username, email, password, UserRole::Guest).await?;
        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> DomainResult<User> {
        if self.repos.users().exists(username, email).await? {
            return Err(DomainError::Conflict("Username or email already exists".into()));
        }

        let password_hash = hash_password_with_cost(password, self.bcrypt_cost)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))?;

        let now = Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        self.repos.users().insert(user.clone()).await?;
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn find_user(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity: "User",
                field: "id",
                value: id.to_string(),
            })
    }

    // ── Startup ─────────────────────────────────────────────────

    /// Create the admin account when no user exists yet.
    pub async fn ensure_default_admin(&self, admin: &DefaultAdmin) -> DomainResult<bool> {
        if self.repos.users().count().await? > 0 {
            return Ok(false);
        }
        let user = self
            .create_user(&admin.username, &admin.email, &admin.password, UserRole::Admin)
            .await?;
        info!(username = %user.username, "👤 Default admin account created");
        Ok(true)
    }
}
