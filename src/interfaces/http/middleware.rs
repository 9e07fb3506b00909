//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::UserRole;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig, TokenClaims};
use crate::infrastructure::crypto::TokenRevocations;
use crate::interfaces::http::common::ApiResponse;

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    RevokedToken,
    InsufficientPermissions,
}

/// Authentication state containing JWT config and the logout registry
#[derive(Clone)]
pub struct AuthState {
    pub jwt_config: JwtConfig,
    pub revocations: Arc<TokenRevocations>,
}

impl AuthState {
    fn authenticate(&self, auth_header: &str) -> Result<AuthenticatedUser, AuthError> {
        let token = extract_token(auth_header).ok_or(AuthError::InvalidToken)?;
        let claims =
            verify_token(token, &self.jwt_config).map_err(|_| AuthError::InvalidToken)?;
        if self.revocations.is_revoked(&claims.jti) {
            return Err(AuthError::RevokedToken);
        }
        Ok(AuthenticatedUser::from_claims(claims))
    }
}

/// Authenticated user information taken from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
    pub claims: TokenClaims,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            username: claims.username.clone(),
            role: claims.role(),
            claims,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

fn authorization(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
}

/// JWT authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(auth_header) = authorization(&request) else {
        return auth_error_response(AuthError::MissingToken);
    };

    match auth_state.authenticate(auth_header) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => auth_error_response(e),
    }
}

/// Attaches the user when a valid token is present; never rejects
pub async fn optional_auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let user = authorization(&request).and_then(|h| auth_state.authenticate(h).ok());
    if let Some(user) = user {
        request.extensions_mut().insert(user);
    }

    next.run(request).await
}

fn auth_error_response(error: AuthError) -> Response {
    let (status, message) = match error {
        AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Missing authentication token"),
        AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid authentication token"),
        AuthError::RevokedToken => (StatusCode::UNAUTHORIZED, "Token has been revoked"),
        AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, "Insufficient permissions"),
    };

    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

/// Staff or admin only - must be used after auth_middleware
pub async fn staff_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.role.can_manage_bookings() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}

/// Admin-only middleware - must be used after auth_middleware
pub async fn admin_middleware(request: Request<Body>, next: Next) -> Response {
    let user = request.extensions().get::<AuthenticatedUser>();

    match user {
        Some(user) if user.is_admin() => next.run(request).await,
        Some(_) => auth_error_response(AuthError::InsufficientPermissions),
        None => auth_error_response(AuthError::MissingToken),
    }
}
